//! Cost trajectory forecasting from the historical budget time-series.
//!
//! A category with history gets a forecast anchored on its historical mean
//! shifted by the scenario delta, with a two-sigma confidence interval. A
//! category without history falls back to a simple forecast around the new
//! amount. External time-series models are deliberately not part of this
//! crate.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use models::{BudgetDelta, ConfidenceInterval, ForecastResult, TimeSeriesEntry};
use serde::Deserialize;
use tracing::warn;

/// One row of the time-series CSV, with the table's original headers.
#[derive(Debug, Deserialize)]
struct TimeSeriesRow {
    #[serde(rename = "StartDate")]
    start_date: String,
    #[serde(rename = "Subcategory")]
    subcategory: String,
    #[serde(rename = "Amount")]
    amount: f64,
}

#[derive(Debug, Default)]
pub struct CostForecaster {
    history: HashMap<String, Vec<TimeSeriesEntry>>,
}

impl CostForecaster {
    /// Forecaster with no historical data; every category takes the
    /// simple-forecast path.
    pub fn empty() -> Self {
        CostForecaster::default()
    }

    pub fn from_entries(entries: Vec<TimeSeriesEntry>) -> Self {
        let mut history: HashMap<String, Vec<TimeSeriesEntry>> = HashMap::new();
        for entry in entries {
            history.entry(entry.category.clone()).or_default().push(entry);
        }
        for series in history.values_mut() {
            series.sort_by_key(|e| e.start_date);
        }
        CostForecaster { history }
    }

    /// Loads the time-series budget table. Dates are `YYYY-MM-DD`.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("Reading time-series table: {}", path.display()))?;

        let mut entries = Vec::new();
        for row in reader.deserialize() {
            let row: TimeSeriesRow = row
                .with_context(|| format!("Parsing time-series row in {}", path.display()))?;
            let start_date = NaiveDate::parse_from_str(&row.start_date, "%Y-%m-%d")
                .with_context(|| {
                    format!("Invalid date '{}' in {}", row.start_date, path.display())
                })?;
            entries.push(TimeSeriesEntry {
                start_date,
                category: row.subcategory,
                amount: row.amount,
            });
        }
        Ok(CostForecaster::from_entries(entries))
    }

    /// Like `from_csv`, but a missing or unreadable table degrades to an
    /// empty history with a warning instead of failing the run.
    pub fn from_csv_or_empty<P: AsRef<Path>>(path: P) -> Self {
        match CostForecaster::from_csv(&path) {
            Ok(forecaster) => forecaster,
            Err(e) => {
                warn!(
                    path = %path.as_ref().display(),
                    error = %e,
                    "time-series table unavailable, using simple forecasts"
                );
                CostForecaster::empty()
            }
        }
    }

    pub fn has_history(&self, category: &str) -> bool {
        self.history
            .get(category)
            .is_some_and(|series| !series.is_empty())
    }

    /// One forecast per delta, keyed by category in stable order.
    pub fn forecast_deltas(&self, deltas: &[BudgetDelta]) -> BTreeMap<String, ForecastResult> {
        deltas
            .iter()
            .map(|delta| (delta.category.clone(), self.forecast_delta(delta)))
            .collect()
    }

    fn forecast_delta(&self, delta: &BudgetDelta) -> ForecastResult {
        match self.history.get(&delta.category) {
            Some(series) if !series.is_empty() => {
                let amounts: Vec<f64> = series.iter().map(|e| e.amount).collect();
                let mean = amounts.iter().sum::<f64>() / amounts.len() as f64;
                let std = std_dev(&amounts, mean);
                let forecasted = mean + delta.delta;
                ForecastResult {
                    category: delta.category.clone(),
                    forecasted_amount: forecasted,
                    confidence_interval: ConfidenceInterval {
                        lower: forecasted - 2.0 * std,
                        upper: forecasted + 2.0 * std,
                    },
                }
            }
            _ => simple_forecast(delta),
        }
    }
}

/// Fallback when no historical series exists: the post-scenario amount
/// with a +/-10% band.
fn simple_forecast(delta: &BudgetDelta) -> ForecastResult {
    ForecastResult {
        category: delta.category.clone(),
        forecasted_amount: delta.new_amount,
        confidence_interval: ConfidenceInterval {
            lower: delta.new_amount * 0.9,
            upper: delta.new_amount * 1.1,
        },
    }
}

fn std_dev(amounts: &[f64], mean: f64) -> f64 {
    if amounts.len() < 2 {
        return 0.0;
    }
    let variance = amounts
        .iter()
        .map(|a| (a - mean).powi(2))
        .sum::<f64>()
        / (amounts.len() - 1) as f64;
    variance.sqrt()
}
