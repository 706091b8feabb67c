use std::collections::BTreeMap;
use std::sync::Arc;

use ai_client::ChatModel;
use models::{BudgetDelta, ForecastResult, Insight, StrategicGoal};
use serde_json::json;
use tracing::warn;

use crate::parse::{field, split_category_sections, strip_code_fences};
use crate::payload::{deltas_json, goals_json, pretty};

const SYSTEM_PROMPT: &str = "You are an experienced budget analyst with expertise in K-12 \
education finance. You identify patterns, trends, and potential impacts of budget changes on \
educational outcomes, and you always answer in the exact format requested, with one section \
per category and no other text.";

/// Generates per-category insights from forecasts, deltas and goals.
pub struct InsightGenerator {
    model: Arc<dyn ChatModel>,
}

impl InsightGenerator {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        InsightGenerator { model }
    }

    /// Never fails: transport errors and unparseable replies both come
    /// back as a single labelled insight instead.
    pub fn generate(
        &self,
        forecasts: &BTreeMap<String, ForecastResult>,
        deltas: &[BudgetDelta],
        goals: &[StrategicGoal],
    ) -> Vec<Insight> {
        let prompt = format!(
            "Analyze the following budget data and generate detailed insights.\n\n\
             Forecasts: {forecasts}\n\
             Budget Changes: {changes}\n\
             Strategic Goals: {goals}\n\n\
             For each significant change or forecast, answer in exactly this format:\n\n\
             Category: [Category Name]\n\
             Insight: [Clear insight about the impact, with specific numbers]\n\
             Impact: [Effects on educational outcomes, short- and long-term]\n\
             Recommendation: [Specific, actionable recommendation]\n\n\
             Focus on changes that touch strategic goals, changes over 5% or $10,000, and \
             high-priority categories. Do not include any other text or formatting.",
            forecasts = pretty(&json!(forecasts)),
            changes = pretty(&deltas_json(deltas)),
            goals = pretty(&goals_json(goals)),
        );

        let reply = match self.model.chat(SYSTEM_PROMPT, &prompt) {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %format!("{e:#}"), "insight collaborator unavailable");
                return vec![unavailable(&format!("{e:#}"))];
            }
        };

        parse_insights(&reply).unwrap_or_else(|| {
            warn!("insight reply had no parseable sections");
            vec![unparseable()]
        })
    }
}

fn parse_insights(reply: &str) -> Option<Vec<Insight>> {
    // Some models answer with JSON despite the requested format; accept it.
    if let Ok(insights) = serde_json::from_str::<Vec<Insight>>(strip_code_fences(reply)) {
        if !insights.is_empty() {
            return Some(insights);
        }
    }

    let mut insights = Vec::new();
    for section in split_category_sections(reply) {
        let Some(category) = field(section, "Category") else {
            continue;
        };
        let insight = field(section, "Insight").unwrap_or_default();
        let impact = field(section, "Impact").unwrap_or_default();
        let recommendation = field(section, "Recommendation").unwrap_or_default();
        if insight.is_empty() && impact.is_empty() && recommendation.is_empty() {
            continue;
        }
        insights.push(Insight {
            category,
            insight,
            impact,
            recommendation,
        });
    }

    if insights.is_empty() {
        None
    } else {
        Some(insights)
    }
}

fn unparseable() -> Insight {
    Insight {
        category: "Analysis".to_string(),
        insight: "The insight response could not be parsed into the expected format.".to_string(),
        impact: "No per-category insights are available for this scenario.".to_string(),
        recommendation: "Review the scenario and budget deltas manually.".to_string(),
    }
}

fn unavailable(reason: &str) -> Insight {
    Insight {
        category: "Analysis".to_string(),
        insight: format!("The insight collaborator was unavailable: {reason}"),
        impact: "No per-category insights are available for this scenario.".to_string(),
        recommendation: "Retry once the analysis service is reachable.".to_string(),
    }
}
