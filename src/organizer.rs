//! Import-time helpers that shape bulk card data into sections.

use crate::model::{Card, Section};
use std::collections::{BTreeSet, HashSet};

/// Starts a new section every time a card's title differs from the title of
/// the card before it. Input order is kept.
pub fn partition_by_title(cards: impl IntoIterator<Item = Card>) -> Vec<Section> {
    let mut sections: Vec<Vec<Card>> = Vec::new();
    for card in cards {
        match sections.last_mut() {
            Some(run) if run.last().is_some_and(|prev| prev.title == card.title) => {
                run.push(card);
            }
            _ => sections.push(vec![card]),
        }
    }
    sections.into_iter().map(Section::from_cards).collect()
}

/// Moves every section with at most `max_size` cards into one trailing
/// section, keeping the relative order of the moved cards. Larger sections
/// keep their order. Nothing is appended when no section qualifies.
pub fn regroup_small_sections(sections: Vec<Section>, max_size: usize) -> Vec<Section> {
    let small_count = sections.iter().filter(|s| s.len() <= max_size).count();
    if small_count == 0 {
        return sections;
    }
    let mut kept = Vec::with_capacity(sections.len());
    let mut misc = Vec::new();
    for section in sections {
        if section.len() <= max_size {
            misc.extend(section.into_cards());
        } else {
            kept.push(section);
        }
    }
    kept.push(Section::from_cards(misc));
    log::debug!(
        "regrouped {small_count} small sections into a trailing section of {} cards",
        kept.last().map_or(0, Section::len)
    );
    kept
}

/// Keeps one card per distinct (title, name, legend, rules, cost value, cost
/// type) tuple. The result is sorted ascending by that tuple, not by input
/// order.
pub fn deduplicate(cards: impl IntoIterator<Item = Card>) -> Vec<Card> {
    cards.into_iter().collect::<BTreeSet<Card>>().into_iter().collect()
}

/// Like [`deduplicate`], but keeps the first occurrence of each card in its
/// original position.
pub fn deduplicate_preserving_order(cards: impl IntoIterator<Item = Card>) -> Vec<Card> {
    let mut seen = HashSet::new();
    cards
        .into_iter()
        .filter(|card| seen.insert(card.clone()))
        .collect()
}
