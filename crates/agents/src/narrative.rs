use std::sync::Arc;

use ai_client::ChatModel;
use models::{
    Insight, NarrativeSummary, OffsetRecommendation, Scenario, StrategicGoal, TradeOff,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::parse::strip_code_fences;
use crate::payload::{goals_json, pretty};

const SYSTEM_PROMPT: &str = "You are a skilled communicator specializing in K-12 education \
finance. You translate budget analyses into clear, actionable summaries for district \
stakeholders, and you always answer with a single valid JSON object and nothing else.";

/// The JSON shape requested from the model; missing fields default to
/// empty rather than failing the whole reply.
#[derive(Debug, Deserialize)]
struct NarrativeFields {
    #[serde(default)]
    executive_summary: String,
    #[serde(default)]
    key_findings: Vec<String>,
    #[serde(default)]
    recommendations: Vec<String>,
    #[serde(default)]
    strategic_implications: Vec<String>,
    #[serde(default)]
    narrative: String,
}

/// Folds a scenario's insights, offsets and trade-offs into the final
/// narrative summary.
pub struct NarrativeGenerator {
    model: Arc<dyn ChatModel>,
}

impl NarrativeGenerator {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        NarrativeGenerator { model }
    }

    pub fn generate(
        &self,
        scenario: &Scenario,
        insights: &[Insight],
        offsets: &[OffsetRecommendation],
        tradeoffs: &[TradeOff],
        goals: &[StrategicGoal],
    ) -> NarrativeSummary {
        let prompt = format!(
            "Generate a comprehensive narrative summary for scenario {id}.\n\n\
             Scenario: {scenario}\n\
             Insights: {insights}\n\
             Offset Recommendations: {offsets}\n\
             Trade-off Analysis: {tradeoffs}\n\
             Strategic Goals: {goals}\n\n\
             Summarize the key findings, highlight significant impacts, explain the rationale \
             behind the recommendations, and address risks and mitigations.\n\n\
             Answer with a single JSON object with exactly these fields:\n\
             - executive_summary: string\n\
             - key_findings: array of strings\n\
             - recommendations: array of strings\n\
             - strategic_implications: array of strings\n\
             - narrative: string",
            id = scenario.id,
            scenario = pretty(&json!(scenario)),
            insights = pretty(&json!(insights)),
            offsets = pretty(&json!(offsets)),
            tradeoffs = pretty(&json!(tradeoffs)),
            goals = pretty(&goals_json(goals)),
        );

        let reply = match self.model.chat(SYSTEM_PROMPT, &prompt) {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %format!("{e:#}"), "narrative collaborator unavailable");
                return NarrativeSummary::failure(
                    &scenario.id,
                    &format!("narrative collaborator unavailable: {e:#}"),
                );
            }
        };

        match serde_json::from_str::<NarrativeFields>(strip_code_fences(&reply)) {
            Ok(fields) => NarrativeSummary {
                scenario_id: scenario.id.clone(),
                executive_summary: fields.executive_summary,
                key_findings: fields.key_findings,
                recommendations: fields.recommendations,
                strategic_implications: fields.strategic_implications,
                narrative: fields.narrative,
            },
            Err(e) => {
                warn!(error = %e, "narrative reply was not valid JSON");
                NarrativeSummary::failure(
                    &scenario.id,
                    "narrative output could not be parsed as JSON",
                )
            }
        }
    }
}
