use models::{BudgetDelta, BudgetEntry, Scenario, ScenarioChange};

use crate::constraints::ConstraintRegistry;
use crate::error::{BudgetError, Result};
use crate::store::BudgetStore;

/// Applies a scenario's change to every matching store row and returns one
/// delta per row.
///
/// All validation runs before any mutation, so a failing scenario leaves
/// the store untouched. Zero matching rows after validation yields an
/// empty delta list, not an error.
pub fn apply_scenario(
    scenario: &Scenario,
    registry: &ConstraintRegistry,
    store: &mut BudgetStore,
) -> Result<Vec<BudgetDelta>> {
    if !store.contains(&scenario.target_category) {
        return Err(BudgetError::CategoryNotFound(
            scenario.target_category.clone(),
        ));
    }
    registry.check(&scenario.target_category)?;
    validate_change(scenario)?;

    let mut deltas = Vec::new();
    for entry in store.entries_mut() {
        if entry.category != scenario.target_category {
            continue;
        }
        let old_amount = entry.amount;
        let new_amount = compute_new_amount(old_amount, &scenario.change);
        *entry = BudgetEntry {
            amount: new_amount,
            ..entry.clone()
        };
        deltas.push(BudgetDelta {
            category: scenario.target_category.clone(),
            old_amount,
            new_amount,
            delta: new_amount - old_amount,
        });
    }
    Ok(deltas)
}

/// One convention for every code path:
/// - Percentage: fraction in [0, 1], `old * (1 + value)`
/// - FixedDelta: `old + value`
/// - DeferralMonths: pro-rated monthly reduction, `old * (1 - months/12)`
fn compute_new_amount(old_amount: f64, change: &ScenarioChange) -> f64 {
    match change {
        ScenarioChange::Percentage(fraction) => old_amount * (1.0 + fraction),
        ScenarioChange::FixedDelta(delta) => old_amount + delta,
        ScenarioChange::DeferralMonths(months) => old_amount * (1.0 - f64::from(*months) / 12.0),
    }
}

fn validate_change(scenario: &Scenario) -> Result<()> {
    let invalid = |reason: String| BudgetError::InvalidScenarioValue {
        scenario: scenario.id.clone(),
        reason,
    };
    match scenario.change {
        ScenarioChange::Percentage(fraction) => {
            // NaN fails the range check as well.
            if !(0.0..=1.0).contains(&fraction) {
                return Err(invalid(format!(
                    "percentage {fraction} outside the 0-1 fraction range"
                )));
            }
        }
        ScenarioChange::FixedDelta(delta) => {
            if !delta.is_finite() {
                return Err(invalid(format!("fixed delta {delta} is not finite")));
            }
        }
        ScenarioChange::DeferralMonths(months) => {
            if months > 12 {
                return Err(invalid(format!(
                    "cannot defer {months} months within a 12-month cycle"
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::{FundingSource, Periodicity};

    fn entry(category: &str, amount: f64) -> BudgetEntry {
        BudgetEntry {
            category: category.to_string(),
            amount,
            year: 2025,
            periodicity: Periodicity::Annual,
        }
    }

    fn store() -> BudgetStore {
        BudgetStore::new(vec![
            entry("Math Teachers", 240_000.0),
            entry("Smartboards", 50_000.0),
            entry("Reading Coaches", 120_000.0),
        ])
    }

    fn registry() -> ConstraintRegistry {
        ConstraintRegistry::from_sources(vec![
            (
                "General Fund".to_string(),
                FundingSource {
                    categories: vec!["Math Teachers".to_string(), "Smartboards".to_string()],
                    locked: false,
                    note: None,
                },
            ),
            (
                "Title I".to_string(),
                FundingSource {
                    categories: vec!["Reading Coaches".to_string()],
                    locked: true,
                    note: Some("federal grant".to_string()),
                },
            ),
        ])
    }

    fn scenario(id: &str, category: &str, change: ScenarioChange) -> Scenario {
        Scenario {
            id: id.to_string(),
            target_category: category.to_string(),
            change,
            description: None,
        }
    }

    #[test]
    fn test_percentage_increase() {
        let mut store = store();
        let deltas = apply_scenario(
            &scenario("S1", "Math Teachers", ScenarioChange::Percentage(0.05)),
            &registry(),
            &mut store,
        )
        .unwrap();

        assert_eq!(deltas.len(), 1);
        assert_eq!(deltas[0].old_amount, 240_000.0);
        assert!((deltas[0].new_amount - 252_000.0).abs() < 0.01);
        assert!((deltas[0].delta - 12_000.0).abs() < 0.01);
        assert!((store.amount_of("Math Teachers").unwrap() - 252_000.0).abs() < 0.01);
    }

    #[test]
    fn test_deferral_prorates_within_cycle() {
        let mut store = store();
        let deltas = apply_scenario(
            &scenario("S2", "Smartboards", ScenarioChange::DeferralMonths(6)),
            &registry(),
            &mut store,
        )
        .unwrap();

        assert_eq!(deltas[0].new_amount, 25_000.0);
        assert_eq!(deltas[0].delta, -25_000.0);
    }

    #[test]
    fn test_fixed_delta_can_be_negative() {
        let mut store = store();
        let deltas = apply_scenario(
            &scenario("S3", "Smartboards", ScenarioChange::FixedDelta(-10_000.0)),
            &registry(),
            &mut store,
        )
        .unwrap();

        assert_eq!(deltas[0].new_amount, 40_000.0);
        assert_eq!(store.amount_of("Smartboards"), Some(40_000.0));
    }

    #[test]
    fn test_identity_changes_are_noops() {
        for change in [
            ScenarioChange::Percentage(0.0),
            ScenarioChange::FixedDelta(0.0),
            ScenarioChange::DeferralMonths(0),
        ] {
            let mut store = store();
            let deltas = apply_scenario(
                &scenario("S4", "Smartboards", change),
                &registry(),
                &mut store,
            )
            .unwrap();
            assert_eq!(deltas[0].delta, 0.0);
            assert_eq!(deltas[0].new_amount, deltas[0].old_amount);
            assert_eq!(store.amount_of("Smartboards"), Some(50_000.0));
        }
    }

    #[test]
    fn test_locked_category_rejected_without_mutation() {
        let mut store = store();
        let baseline = store.clone();
        let err = apply_scenario(
            &scenario("S5", "Reading Coaches", ScenarioChange::Percentage(0.1)),
            &registry(),
            &mut store,
        )
        .unwrap_err();

        assert!(matches!(err, BudgetError::ConstraintViolation { .. }));
        assert_eq!(store, baseline);
    }

    #[test]
    fn test_missing_category_rejected_without_mutation() {
        let mut store = store();
        let baseline = store.clone();
        let err = apply_scenario(
            &scenario("S6", "Art Supplies", ScenarioChange::FixedDelta(1_000.0)),
            &registry(),
            &mut store,
        )
        .unwrap_err();

        assert!(matches!(err, BudgetError::CategoryNotFound(c) if c == "Art Supplies"));
        assert_eq!(store, baseline);
    }

    #[test]
    fn test_out_of_domain_values_rejected() {
        let cases = [
            ScenarioChange::Percentage(1.5),
            ScenarioChange::Percentage(-0.1),
            ScenarioChange::Percentage(f64::NAN),
            ScenarioChange::FixedDelta(f64::INFINITY),
            ScenarioChange::DeferralMonths(13),
        ];
        for change in cases {
            let mut store = store();
            let baseline = store.clone();
            let err = apply_scenario(
                &scenario("S7", "Math Teachers", change),
                &registry(),
                &mut store,
            )
            .unwrap_err();
            assert!(matches!(err, BudgetError::InvalidScenarioValue { .. }));
            assert_eq!(store, baseline);
        }
    }

    #[test]
    fn test_validation_order_reports_missing_before_constraint() {
        // Absent from the store and unknown to the registry: store
        // membership is checked first.
        let mut store = store();
        let err = apply_scenario(
            &scenario("S8", "Band Uniforms", ScenarioChange::Percentage(2.0)),
            &registry(),
            &mut store,
        )
        .unwrap_err();
        assert!(matches!(err, BudgetError::CategoryNotFound(_)));
    }
}
