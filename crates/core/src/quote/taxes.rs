//! Tax catalog: rounded percentage → external tax identifier
//!
//! Percentages are keyed in tenths of a percent so lookups never depend on
//! float equality. Insertion order is preserved because the first recorded
//! identifier doubles as the fallback for unknown rates.

/// Mapping from tax percentage (rounded to one decimal) to the platform's
/// numeric tax identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxCatalog {
    entries: Vec<(i32, i64)>,
}

impl TaxCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn tenths(rate: f64) -> i32 {
        (rate * 10.0).round() as i32
    }

    /// Record a rate→id pair. The first writer for a rounded rate wins.
    pub fn insert(&mut self, rate: f64, id: i64) {
        let key = Self::tenths(rate);
        if !self.entries.iter().any(|(existing, _)| *existing == key) {
            self.entries.push((key, id));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Resolve the identifier for a rate. Unknown rates fall back to the
    /// first recorded identifier; an empty catalog yields `fallback_id`.
    pub fn id_for_rate(&self, rate: f64, fallback_id: i64) -> i64 {
        let key = Self::tenths(rate);
        self.entries
            .iter()
            .find(|(existing, _)| *existing == key)
            .or_else(|| self.entries.first())
            .map(|(_, id)| *id)
            .unwrap_or(fallback_id)
    }

    /// All recorded identifiers in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.entries.iter().map(|(_, id)| *id)
    }
}
