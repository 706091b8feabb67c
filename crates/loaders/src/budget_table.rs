use std::collections::BTreeSet;
use std::path::Path;

use budget::BudgetStore;
use models::{BudgetEntry, Periodicity};
use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// One row of the snapshot budget CSV, with the table's original headers.
#[derive(Debug, Deserialize)]
struct BudgetRow {
    #[serde(rename = "Subcategory")]
    subcategory: String,
    #[serde(rename = "Amount")]
    amount: f64,
    #[serde(rename = "Year")]
    year: i32,
    #[serde(rename = "AmountType")]
    amount_type: String,
}

/// Loads the snapshot budget table into a store. The file must be
/// non-empty and list each subcategory at most once, so snapshots taken
/// from the store keep both invariants for free.
pub fn load_budget_table<P: AsRef<Path>>(path: P) -> Result<BudgetStore> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path).map_err(|e| ConfigError::csv(path, e))?;

    let mut seen = BTreeSet::new();
    let mut entries = Vec::new();
    for row in reader.deserialize() {
        let row: BudgetRow = row.map_err(|e| ConfigError::csv(path, e))?;
        let periodicity = Periodicity::from_label(&row.amount_type).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "budget row '{}' has unknown amount type '{}'",
                row.subcategory, row.amount_type
            ))
        })?;
        if !seen.insert(row.subcategory.clone()) {
            return Err(ConfigError::Invalid(format!(
                "budget lists subcategory '{}' more than once",
                row.subcategory
            )));
        }
        entries.push(BudgetEntry {
            category: row.subcategory,
            amount: row.amount,
            year: row.year,
            periodicity,
        });
    }

    if entries.is_empty() {
        return Err(ConfigError::Invalid(format!(
            "{} contains no budget rows",
            path.display()
        )));
    }
    Ok(BudgetStore::new(entries))
}
