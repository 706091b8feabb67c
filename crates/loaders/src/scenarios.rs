use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use models::{Scenario, ScenarioChange};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ConfigError, Result};

/// Raw scenario record as persisted: three nullable change fields that the
/// loader collapses into the closed `ScenarioChange` union. Internal code
/// only ever sees the canonical `Scenario`.
#[derive(Debug, Deserialize)]
struct ScenarioRecord {
    id: String,
    target_category: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    percentage: Option<f64>,
    #[serde(default)]
    fixed_delta: Option<f64>,
    #[serde(default)]
    defer_months: Option<u32>,
}

impl ScenarioRecord {
    fn into_scenario(self) -> Result<Scenario> {
        let change = match (self.percentage, self.fixed_delta, self.defer_months) {
            (Some(p), None, None) => ScenarioChange::Percentage(p),
            (None, Some(d), None) => ScenarioChange::FixedDelta(d),
            (None, None, Some(m)) => ScenarioChange::DeferralMonths(m),
            (None, None, None) => {
                return Err(ConfigError::Invalid(format!(
                    "scenario '{}' sets none of percentage, fixed_delta, defer_months",
                    self.id
                )))
            }
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "scenario '{}' sets more than one of percentage, fixed_delta, defer_months",
                    self.id
                )))
            }
        };
        Ok(Scenario {
            id: self.id,
            target_category: self.target_category,
            change,
            description: self.description,
        })
    }
}

/// The scenario list file, kept as raw JSON records so one malformed
/// scenario cannot poison the batch: canonicalization happens per id at
/// lookup time.
#[derive(Debug)]
pub struct ScenarioList {
    records: Vec<Value>,
}

impl ScenarioList {
    /// Accepts both a top-level array and an object with a `scenarios`
    /// key, matching the two formats found in the wild.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let value: Value = serde_json::from_str(&raw).map_err(|e| ConfigError::json(path, e))?;

        let records = match value {
            Value::Array(items) => items,
            Value::Object(mut map) => match map.remove("scenarios") {
                Some(Value::Array(items)) => items,
                _ => {
                    return Err(ConfigError::Invalid(format!(
                        "{} has no top-level array or 'scenarios' key",
                        path.display()
                    )))
                }
            },
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "{} is not a scenario list",
                    path.display()
                )))
            }
        };

        // Every record must carry a unique id. A record without one could
        // never be looked up, so it would silently drop out of the batch.
        let mut seen = BTreeSet::new();
        for record in &records {
            let Some(id) = record.get("id").and_then(Value::as_str).filter(|id| !id.is_empty())
            else {
                return Err(ConfigError::Invalid(format!(
                    "{} contains a scenario record without an id",
                    path.display()
                )));
            };
            if !seen.insert(id.to_string()) {
                return Err(ConfigError::Invalid(format!(
                    "{} lists scenario id '{id}' more than once",
                    path.display()
                )));
            }
        }
        Ok(ScenarioList { records })
    }

    /// Ids in file order. `load` guarantees every record has one.
    pub fn ids(&self) -> Vec<String> {
        self.records
            .iter()
            .filter_map(|r| r.get("id").and_then(Value::as_str))
            .map(str::to_string)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Looks up a scenario by id and canonicalizes it.
    pub fn get(&self, scenario_id: &str) -> Result<Scenario> {
        let raw = self
            .records
            .iter()
            .find(|r| r.get("id").and_then(Value::as_str) == Some(scenario_id))
            .ok_or_else(|| {
                ConfigError::Invalid(format!("scenario '{scenario_id}' not found"))
            })?;
        let record: ScenarioRecord = serde_json::from_value(raw.clone()).map_err(|e| {
            ConfigError::Invalid(format!("scenario '{scenario_id}' is malformed: {e}"))
        })?;
        record.into_scenario()
    }
}
