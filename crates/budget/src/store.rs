use std::collections::BTreeMap;

use models::BudgetEntry;

/// In-memory budget state, one entry per category.
///
/// The store is mutated in place by the scenario applier and put back to
/// its baseline by `Snapshot::restore` after each scenario, so consecutive
/// scenarios always start from the same canonical budget.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetStore {
    entries: Vec<BudgetEntry>,
}

impl BudgetStore {
    pub fn new(entries: Vec<BudgetEntry>) -> Self {
        BudgetStore { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[BudgetEntry] {
        &self.entries
    }

    pub(crate) fn entries_mut(&mut self) -> &mut Vec<BudgetEntry> {
        &mut self.entries
    }

    pub fn contains(&self, category: &str) -> bool {
        self.entries.iter().any(|e| e.category == category)
    }

    pub fn amount_of(&self, category: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.category == category)
            .map(|e| e.amount)
    }

    /// Current amounts keyed by category, in stable order. Used to hand
    /// downstream collaborators a view of the post-scenario budget.
    pub fn amounts_by_category(&self) -> BTreeMap<String, f64> {
        self.entries
            .iter()
            .map(|e| (e.category.clone(), e.amount))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::Periodicity;

    fn entry(category: &str, amount: f64) -> BudgetEntry {
        BudgetEntry {
            category: category.to_string(),
            amount,
            year: 2025,
            periodicity: Periodicity::Annual,
        }
    }

    #[test]
    fn test_lookup_helpers() {
        let store = BudgetStore::new(vec![
            entry("Math Teachers", 240_000.0),
            entry("Smartboards", 50_000.0),
        ]);
        assert_eq!(store.len(), 2);
        assert!(store.contains("Smartboards"));
        assert!(!store.contains("Art Supplies"));
        assert_eq!(store.amount_of("Math Teachers"), Some(240_000.0));
        assert_eq!(store.amount_of("Art Supplies"), None);
    }

    #[test]
    fn test_amounts_by_category_is_sorted() {
        let store = BudgetStore::new(vec![
            entry("Smartboards", 50_000.0),
            entry("Math Teachers", 240_000.0),
        ]);
        let amounts = store.amounts_by_category();
        let keys: Vec<&String> = amounts.keys().collect();
        assert_eq!(keys, vec!["Math Teachers", "Smartboards"]);
    }
}
