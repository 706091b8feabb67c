use std::sync::Arc;

use ai_client::ChatModel;
use models::{BudgetDelta, OffsetRecommendation, StrategicGoal};
use serde_json::json;
use tracing::warn;

use crate::parse::{field, split_category_sections};
use crate::payload::{deltas_json, goals_json, pretty};

const SYSTEM_PROMPT: &str = "You are a strategic budget advisor with deep experience in K-12 \
education finance. You identify budget offsets that balance changes while maintaining \
educational quality, and you always answer in the exact format requested, with one section per \
category and no other text.";

/// Recommends offsets that balance a scenario's budget changes.
pub struct OffsetAdvisor {
    model: Arc<dyn ChatModel>,
    constraint_notes: Vec<String>,
}

impl OffsetAdvisor {
    /// `constraint_notes` are the funding sources' free-text notes; they
    /// are surfaced to the model so it avoids recommending offsets from
    /// restricted funds.
    pub fn new(model: Arc<dyn ChatModel>, constraint_notes: Vec<String>) -> Self {
        OffsetAdvisor {
            model,
            constraint_notes,
        }
    }

    pub fn recommend(
        &self,
        deltas: &[BudgetDelta],
        goals: &[StrategicGoal],
    ) -> Vec<OffsetRecommendation> {
        let prompt = format!(
            "Analyze the following budget changes and strategic goals and provide offset \
             recommendations.\n\n\
             Budget Changes: {changes}\n\
             Strategic Goals: {goals}\n\
             Funding Notes: {notes}\n\n\
             For each significant budget change, answer in exactly this format:\n\n\
             Category: [Category Name]\n\
             Offset Amount: [Amount to offset]\n\
             Rationale: [Why this offset is recommended]\n\
             Impact: [Impact on strategic goals and educational outcomes]\n\
             Implementation: [Specific steps to implement the offset]\n\n\
             Align offsets with strategic goals, minimize negative impact on outcomes, and keep \
             adjustments sustainable. Do not include any other text or formatting.",
            changes = pretty(&deltas_json(deltas)),
            goals = pretty(&goals_json(goals)),
            notes = pretty(&json!(self.constraint_notes)),
        );

        let reply = match self.model.chat(SYSTEM_PROMPT, &prompt) {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %format!("{e:#}"), "offset collaborator unavailable");
                return vec![unavailable(&format!("{e:#}"))];
            }
        };

        let recommendations = parse_offsets(&reply);
        if recommendations.is_empty() {
            warn!("offset reply had no parseable sections");
            vec![unparseable()]
        } else {
            recommendations
        }
    }
}

fn parse_offsets(reply: &str) -> Vec<OffsetRecommendation> {
    let mut recommendations = Vec::new();
    for section in split_category_sections(reply) {
        let Some(category) = field(section, "Category") else {
            continue;
        };
        let offset_amount = field(section, "Offset Amount").unwrap_or_default();
        let rationale = field(section, "Rationale").unwrap_or_default();
        let impact = field(section, "Impact").unwrap_or_default();
        let implementation = field(section, "Implementation").unwrap_or_default();
        if offset_amount.is_empty()
            && rationale.is_empty()
            && impact.is_empty()
            && implementation.is_empty()
        {
            continue;
        }
        recommendations.push(OffsetRecommendation {
            category,
            offset_amount,
            rationale,
            impact,
            implementation,
        });
    }
    recommendations
}

fn unparseable() -> OffsetRecommendation {
    OffsetRecommendation {
        category: "Analysis".to_string(),
        offset_amount: String::new(),
        rationale: "The offset response could not be parsed into the expected format."
            .to_string(),
        impact: "No offset recommendations are available for this scenario.".to_string(),
        implementation: "Review candidate offsets manually.".to_string(),
    }
}

fn unavailable(reason: &str) -> OffsetRecommendation {
    OffsetRecommendation {
        category: "Analysis".to_string(),
        offset_amount: String::new(),
        rationale: format!("The offset collaborator was unavailable: {reason}"),
        impact: "No offset recommendations are available for this scenario.".to_string(),
        implementation: "Retry once the analysis service is reachable.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubModel;

    #[test]
    fn test_parses_offset_sections() {
        let advisor = OffsetAdvisor::new(
            Arc::new(StubModel::replying(
                "Category: Smartboards\n\
                 Offset Amount: $10,000\n\
                 Rationale: Defer refresh cycle by one year.\n\
                 Impact: Minimal effect on classrooms already equipped.\n\
                 Implementation: Pause procurement for Q3 and Q4.\n",
            )),
            vec!["Title I: Federal funds, no reallocation".to_string()],
        );
        let recs = advisor.recommend(&[], &[]);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].category, "Smartboards");
        assert_eq!(recs[0].offset_amount, "$10,000");
        assert!(recs[0].implementation.contains("procurement"));
    }

    #[test]
    fn test_unparseable_reply_yields_labelled_record() {
        let advisor = OffsetAdvisor::new(Arc::new(StubModel::replying("n/a")), Vec::new());
        let recs = advisor.recommend(&[], &[]);
        assert_eq!(recs.len(), 1);
        assert!(recs[0].rationale.contains("could not be parsed"));
    }
}
