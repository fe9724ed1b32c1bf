use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    /// A single line (title, name, cost text) is wider than its box.
    HorizontalOverflow,
    /// Wrapped legend or rules text is taller than the space left for it.
    VerticalOverflow,
    /// The bordered cost badges together are wider than the card.
    CostBadgesTooWide,
}

/// Where on the printed output a warning applies. Both numbers are 1-based
/// as a reader of the printout counts them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotRef {
    pub page: usize,
    pub card: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutWarning {
    pub kind: WarningKind,
    pub slot: SlotRef,
    pub message: String,
}

impl fmt::Display for LayoutWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "page {}, card {}: {}",
            self.slot.page, self.slot.card, self.message
        )
    }
}

/// Append-only list of layout warnings gathered over one export.
#[derive(Debug, Clone, Default)]
pub struct LayoutWarnings {
    entries: Vec<LayoutWarning>,
}

impl LayoutWarnings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, kind: WarningKind, slot: SlotRef, message: impl Into<String>) {
        let warning = LayoutWarning {
            kind,
            slot,
            message: message.into(),
        };
        log::warn!("{warning}");
        self.entries.push(warning);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LayoutWarning> {
        self.entries.iter()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries.iter().map(|w| w.to_string()).collect()
    }

    pub fn into_vec(self) -> Vec<LayoutWarning> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_page_and_card() {
        let mut warnings = LayoutWarnings::new();
        warnings.record(
            WarningKind::VerticalOverflow,
            SlotRef { page: 2, card: 7 },
            "rules out of vertical space",
        );
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings.messages(),
            vec!["page 2, card 7: rules out of vertical space".to_string()]
        );
    }

    #[test]
    fn order_is_preserved() {
        let mut warnings = LayoutWarnings::new();
        let slot = SlotRef { page: 1, card: 1 };
        warnings.record(WarningKind::HorizontalOverflow, slot, "first");
        warnings.record(WarningKind::CostBadgesTooWide, slot, "second");
        let kinds: Vec<_> = warnings.iter().map(|w| w.kind).collect();
        assert_eq!(
            kinds,
            vec![WarningKind::HorizontalOverflow, WarningKind::CostBadgesTooWide]
        );
    }
}
