use serde::{Deserialize, Serialize};

/// One printable card. Field order is the sort order used for deduplication.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Card {
    pub title: String,
    pub name: String,
    pub legend: String,
    pub rules: String,
    pub cost_value: String,
    pub cost_type: String,
}

impl Card {
    pub fn new(title: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_legend(mut self, legend: impl Into<String>) -> Self {
        self.legend = legend.into();
        self
    }

    pub fn with_rules(mut self, rules: impl Into<String>) -> Self {
        self.rules = rules.into();
        self
    }

    pub fn with_cost(mut self, value: impl Into<String>, kind: impl Into<String>) -> Self {
        self.cost_value = value.into();
        self.cost_type = kind.into();
        self
    }
}

/// An ordered run of cards printed together under one bookmark. The display
/// name is derived from the members and recomputed after every mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    cards: Vec<Card>,
    name: String,
}

impl Section {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        let name = common_title_prefix(&cards);
        Self { cards, name }
    }

    /// Longest run of leading words shared by every member title; empty for
    /// an empty section.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
        self.recompute();
    }

    pub fn insert(&mut self, index: usize, card: Card) {
        self.cards.insert(index, card);
        self.recompute();
    }

    pub fn remove(&mut self, index: usize) -> Card {
        let card = self.cards.remove(index);
        self.recompute();
        card
    }

    pub fn extend(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.cards.extend(cards);
        self.recompute();
    }

    pub fn retain(&mut self, keep: impl FnMut(&Card) -> bool) {
        self.cards.retain(keep);
        self.recompute();
    }

    /// Runs an arbitrary edit on the member list, then refreshes the name.
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut Vec<Card>) -> R) -> R {
        let result = f(&mut self.cards);
        self.recompute();
        result
    }

    pub fn into_cards(self) -> Vec<Card> {
        self.cards
    }

    fn recompute(&mut self) {
        self.name = common_title_prefix(&self.cards);
    }
}

impl FromIterator<Card> for Section {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        Section::from_cards(iter.into_iter().collect())
    }
}

fn common_title_prefix(cards: &[Card]) -> String {
    let Some((first, rest)) = cards.split_first() else {
        return String::new();
    };
    let mut prefix: Vec<&str> = first.title.split_whitespace().collect();
    for card in rest {
        let shared = prefix
            .iter()
            .zip(card.title.split_whitespace())
            .take_while(|(a, b)| **a == *b)
            .count();
        prefix.truncate(shared);
        if prefix.is_empty() {
            break;
        }
    }
    prefix.join(" ")
}

/// Ordered sections; the order is the page and bookmark order of the export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardCollection {
    pub sections: Vec<Section>,
}

impl CardCollection {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    pub fn push(&mut self, section: Section) {
        self.sections.push(section);
    }

    pub fn card_count(&self) -> usize {
        self.sections.iter().map(Section::len).sum()
    }

    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.sections.iter().flat_map(|section| section.cards().iter())
    }
}

impl FromIterator<Section> for CardCollection {
    fn from_iter<I: IntoIterator<Item = Section>>(iter: I) -> Self {
        CardCollection::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titled(title: &str) -> Card {
        Card::new(title, "")
    }

    #[test]
    fn name_is_common_leading_words() {
        let section: Section = ["Red Dragon Whelp", "Red Dragon Elder", " Red  Dragon"]
            .into_iter()
            .map(titled)
            .collect();
        assert_eq!(section.name(), "Red Dragon");
    }

    #[test]
    fn partial_words_do_not_count() {
        let section: Section = ["Redcap", "Red cap"].into_iter().map(titled).collect();
        assert_eq!(section.name(), "");
    }

    #[test]
    fn empty_section_has_empty_name() {
        let mut section = Section::from_cards(vec![titled("Goblin Raider")]);
        assert_eq!(section.name(), "Goblin Raider");
        section.remove(0);
        assert!(section.is_empty());
        assert_eq!(section.name(), "");
    }

    #[test]
    fn mutations_recompute_the_name() {
        let mut section = Section::new();
        section.push(titled("Elf Archer"));
        assert_eq!(section.name(), "Elf Archer");
        section.push(titled("Elf Druid"));
        assert_eq!(section.name(), "Elf");
        section.edit(|cards| cards.truncate(1));
        assert_eq!(section.name(), "Elf Archer");
        section.insert(0, titled("Dwarf"));
        assert_eq!(section.name(), "");
        section.retain(|card| card.title.starts_with("Elf"));
        assert_eq!(section.name(), "Elf Archer");
    }

    #[test]
    fn collection_counts_cards_in_order() {
        let collection: CardCollection = vec![
            Section::from_cards(vec![titled("A"), titled("B")]),
            Section::new(),
            Section::from_cards(vec![titled("C")]),
        ]
        .into_iter()
        .collect();
        assert_eq!(collection.card_count(), 3);
        let titles: Vec<_> = collection.cards().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
    }
}
