use indexmap::IndexSet;

use crate::poi::PoiCatalogue;

/// Identifiers of POIs consumed during the current walk, in the order they
/// were consumed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DisabledSet {
    ids: IndexSet<String>,
}

impl DisabledSet {
    pub fn new() -> Self {
        DisabledSet::default()
    }

    /// Returns `false` when `id` was already present.
    pub fn insert(&mut self, id: &str) -> bool {
        if self.ids.contains(id) {
            return false;
        }

        self.ids.insert(id.to_string())
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

/// How far through the walk the user is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    pub disabled: usize,
    pub total: usize,
    /// Whole percent, rounded down.
    pub pct: u8,
}

impl Progress {
    pub fn of(disabled: &DisabledSet, catalogue: &PoiCatalogue) -> Progress {
        let total = catalogue.total();
        let disabled = catalogue
            .destinations()
            .iter()
            .filter(|poi| disabled.contains(&poi.id))
            .count();

        let pct = match total {
            0 => 0,
            _ => (disabled * 100 / total) as u8,
        };

        Progress {
            disabled,
            total,
            pct,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.disabled == self.total
    }
}
