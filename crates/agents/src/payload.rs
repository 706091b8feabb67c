//! Structured prompt payloads. The core's obligation at this boundary is
//! well-formed structured input: every prompt embeds pretty-printed JSON
//! of the same records the rest of the pipeline uses.

use std::collections::BTreeMap;

use models::{BudgetDelta, StrategicGoal};
use serde_json::{json, Value};

pub(crate) fn deltas_json(deltas: &[BudgetDelta]) -> Value {
    let by_category: BTreeMap<&str, Value> = deltas
        .iter()
        .map(|d| {
            (
                d.category.as_str(),
                json!({
                    "old_amount": d.old_amount,
                    "new_amount": d.new_amount,
                    "delta": d.delta,
                    "percentage_change": d.percentage_change(),
                }),
            )
        })
        .collect();
    json!(by_category)
}

pub(crate) fn goals_json(goals: &[StrategicGoal]) -> Value {
    json!(goals)
}

pub(crate) fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deltas_json_keys_by_category() {
        let deltas = vec![BudgetDelta {
            category: "Math Teachers".to_string(),
            old_amount: 240_000.0,
            new_amount: 252_000.0,
            delta: 12_000.0,
        }];
        let value = deltas_json(&deltas);
        assert_eq!(value["Math Teachers"]["delta"], json!(12_000.0));
        assert_eq!(value["Math Teachers"]["percentage_change"], json!(5.0));
    }
}
