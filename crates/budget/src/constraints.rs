use std::collections::BTreeSet;

use models::FundingSource;

use crate::error::{BudgetError, Result};

/// Read-only view over all funding sources, built once at startup.
///
/// Sources may declare overlapping categories. The locked set is the union
/// of the categories of every locked source: a category locked by one
/// grant stays locked system-wide even when another grant covering it is
/// unlocked.
#[derive(Debug, Clone)]
pub struct ConstraintRegistry {
    categories: BTreeSet<String>,
    locked: BTreeSet<String>,
    notes: Vec<String>,
}

impl ConstraintRegistry {
    pub fn from_sources<I>(sources: I) -> Self
    where
        I: IntoIterator<Item = (String, FundingSource)>,
    {
        let mut categories = BTreeSet::new();
        let mut locked = BTreeSet::new();
        let mut notes = Vec::new();

        for (name, source) in sources {
            if source.locked {
                locked.extend(source.categories.iter().cloned());
            }
            categories.extend(source.categories);
            if let Some(note) = source.note {
                notes.push(format!("{name}: {note}"));
            }
        }

        ConstraintRegistry {
            categories,
            locked,
            notes,
        }
    }

    pub fn is_valid_category(&self, category: &str) -> bool {
        self.categories.contains(category)
    }

    pub fn is_locked(&self, category: &str) -> bool {
        self.locked.contains(category)
    }

    /// Fails unless `category` is known to a funding source and unlocked.
    pub fn check(&self, category: &str) -> Result<()> {
        if !self.is_valid_category(category) {
            return Err(BudgetError::ConstraintViolation {
                category: category.to_string(),
                reason: "not covered by any funding source".to_string(),
            });
        }
        if self.is_locked(category) {
            return Err(BudgetError::ConstraintViolation {
                category: category.to_string(),
                reason: "locked by its funding source".to_string(),
            });
        }
        Ok(())
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(String::as_str)
    }

    pub fn locked_categories(&self) -> impl Iterator<Item = &str> {
        self.locked.iter().map(String::as_str)
    }

    /// Per-source free-text notes, formatted as "source: note".
    pub fn notes(&self) -> &[String] {
        &self.notes
    }
}
