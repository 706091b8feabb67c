use std::collections::BTreeMap;
use std::sync::Arc;

use ai_client::ChatModel;
use models::{BudgetDelta, StrategicGoal, TradeOff};
use serde_json::json;
use tracing::warn;

use crate::parse::{field, split_category_sections};
use crate::payload::{deltas_json, goals_json, pretty};

const SYSTEM_PROMPT: &str = "You are a strategic budget analyst specializing in K-12 education \
finance. You identify and analyze the trade-offs involved in budget decisions, short- and \
long-term, and you always answer in the exact format requested, with one section per category \
and no other text.";

/// Evaluates the trade-offs a scenario's changes imply against the goals
/// and the post-scenario budget.
pub struct TradeOffEvaluator {
    model: Arc<dyn ChatModel>,
}

impl TradeOffEvaluator {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        TradeOffEvaluator { model }
    }

    pub fn evaluate(
        &self,
        deltas: &[BudgetDelta],
        goals: &[StrategicGoal],
        current_budget: &BTreeMap<String, f64>,
    ) -> Vec<TradeOff> {
        let prompt = format!(
            "Analyze the following budget changes, strategic goals and current budget to \
             evaluate trade-offs.\n\n\
             Budget Changes: {changes}\n\
             Strategic Goals: {goals}\n\
             Current Budget: {budget}\n\n\
             For each significant trade-off, answer in exactly this format:\n\n\
             Category: [Category Name]\n\
             Trade-off: [Description of the trade-off]\n\
             Impact: [Impact on strategic goals and educational outcomes]\n\
             Risk Level: [High/Medium/Low]\n\
             Mitigation: [Steps to mitigate negative impacts]\n\n\
             Consider goal alignment, student outcomes, allocation efficiency and long-term \
             sustainability. Do not include any other text or formatting.",
            changes = pretty(&deltas_json(deltas)),
            goals = pretty(&goals_json(goals)),
            budget = pretty(&json!(current_budget)),
        );

        let reply = match self.model.chat(SYSTEM_PROMPT, &prompt) {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %format!("{e:#}"), "trade-off collaborator unavailable");
                return vec![unavailable(&format!("{e:#}"))];
            }
        };

        let tradeoffs = parse_tradeoffs(&reply);
        if tradeoffs.is_empty() {
            warn!("trade-off reply had no parseable sections");
            vec![unparseable()]
        } else {
            tradeoffs
        }
    }
}

fn parse_tradeoffs(reply: &str) -> Vec<TradeOff> {
    let mut tradeoffs = Vec::new();
    for section in split_category_sections(reply) {
        let Some(category) = field(section, "Category") else {
            continue;
        };
        let tradeoff = field(section, "Trade-off").unwrap_or_default();
        let impact = field(section, "Impact").unwrap_or_default();
        let risk_level = field(section, "Risk Level").unwrap_or_default();
        let mitigation = field(section, "Mitigation").unwrap_or_default();
        if tradeoff.is_empty() && impact.is_empty() && risk_level.is_empty() && mitigation.is_empty()
        {
            continue;
        }
        tradeoffs.push(TradeOff {
            category,
            tradeoff,
            impact,
            risk_level,
            mitigation,
        });
    }
    tradeoffs
}

fn unparseable() -> TradeOff {
    TradeOff {
        category: "Analysis".to_string(),
        tradeoff: "The trade-off response could not be parsed into the expected format."
            .to_string(),
        impact: "No trade-off analysis is available for this scenario.".to_string(),
        risk_level: "Unknown".to_string(),
        mitigation: "Review the scenario's trade-offs manually.".to_string(),
    }
}

fn unavailable(reason: &str) -> TradeOff {
    TradeOff {
        category: "Analysis".to_string(),
        tradeoff: format!("The trade-off collaborator was unavailable: {reason}"),
        impact: "No trade-off analysis is available for this scenario.".to_string(),
        risk_level: "Unknown".to_string(),
        mitigation: "Retry once the analysis service is reachable.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubModel;

    #[test]
    fn test_parses_tradeoff_sections() {
        let evaluator = TradeOffEvaluator::new(Arc::new(StubModel::replying(
            "Category: Smartboards\n\
             Trade-off: Deferring purchases slows modernization.\n\
             Impact: Older classrooms keep outdated equipment longer.\n\
             Risk Level: Medium\n\
             Mitigation: Stage installations by building priority.\n",
        )));
        let tradeoffs = evaluator.evaluate(&[], &[], &BTreeMap::new());
        assert_eq!(tradeoffs.len(), 1);
        assert_eq!(tradeoffs[0].risk_level, "Medium");
        assert!(tradeoffs[0].tradeoff.contains("modernization"));
    }

    #[test]
    fn test_transport_error_yields_labelled_record() {
        let evaluator = TradeOffEvaluator::new(Arc::new(StubModel::failing("timeout")));
        let tradeoffs = evaluator.evaluate(&[], &[], &BTreeMap::new());
        assert_eq!(tradeoffs.len(), 1);
        assert_eq!(tradeoffs[0].risk_level, "Unknown");
        assert!(tradeoffs[0].tradeoff.contains("unavailable"));
    }
}
