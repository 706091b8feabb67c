use models::BudgetEntry;

use crate::error::{BudgetError, Result};
use crate::store::BudgetStore;

/// Immutable copy of the budget taken before a scenario is applied.
///
/// Restoring consumes the snapshot: each processed scenario captures one
/// snapshot and restores it exactly once, on success and on every error
/// exit path alike.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    entries: Vec<BudgetEntry>,
}

impl Snapshot {
    /// Deep-copies every entry of the store. Fails on an empty store so a
    /// snapshot is always non-empty.
    pub fn capture(store: &BudgetStore) -> Result<Self> {
        if store.is_empty() {
            return Err(BudgetError::EmptyStore);
        }
        Ok(Snapshot {
            entries: store.entries().to_vec(),
        })
    }

    pub fn entries(&self) -> &[BudgetEntry] {
        &self.entries
    }

    /// Replaces the store's entire content with the snapshot's entries.
    /// This is a total overwrite, not a merge, and is a no-op when the
    /// store was never mutated.
    pub fn restore(self, store: &mut BudgetStore) {
        *store = BudgetStore::new(self.entries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applier::apply_scenario;
    use crate::constraints::ConstraintRegistry;
    use models::{FundingSource, Periodicity, Scenario, ScenarioChange};

    fn store() -> BudgetStore {
        BudgetStore::new(vec![
            BudgetEntry {
                category: "Math Teachers".to_string(),
                amount: 240_000.0,
                year: 2025,
                periodicity: Periodicity::Annual,
            },
            BudgetEntry {
                category: "Smartboards".to_string(),
                amount: 50_000.0,
                year: 2025,
                periodicity: Periodicity::Annual,
            },
        ])
    }

    fn open_registry() -> ConstraintRegistry {
        ConstraintRegistry::from_sources(vec![(
            "General Fund".to_string(),
            FundingSource {
                categories: vec!["Math Teachers".to_string(), "Smartboards".to_string()],
                locked: false,
                note: None,
            },
        )])
    }

    #[test]
    fn test_capture_empty_store_fails() {
        let empty = BudgetStore::new(vec![]);
        assert!(matches!(
            Snapshot::capture(&empty),
            Err(BudgetError::EmptyStore)
        ));
    }

    #[test]
    fn test_restore_is_exact_after_mutation() {
        let mut store = store();
        let baseline = store.clone();
        let snapshot = Snapshot::capture(&store).unwrap();

        let scenario = Scenario {
            id: "S1".to_string(),
            target_category: "Math Teachers".to_string(),
            change: ScenarioChange::Percentage(0.05),
            description: None,
        };
        apply_scenario(&scenario, &open_registry(), &mut store).unwrap();
        assert_ne!(store, baseline);

        snapshot.restore(&mut store);
        assert_eq!(store, baseline);
    }

    #[test]
    fn test_restore_without_mutation_is_noop() {
        let mut store = store();
        let baseline = store.clone();
        let snapshot = Snapshot::capture(&store).unwrap();
        snapshot.restore(&mut store);
        assert_eq!(store, baseline);
    }
}
