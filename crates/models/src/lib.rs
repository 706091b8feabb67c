use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// Budget state models

/// How often a budgeted amount recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Periodicity {
    Annual,
    Monthly,
    Quarterly,
}

impl Periodicity {
    /// Parses the `AmountType` column of the snapshot budget table.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Annual" => Some(Periodicity::Annual),
            "Monthly" => Some(Periodicity::Monthly),
            "Quarterly" => Some(Periodicity::Quarterly),
            _ => None,
        }
    }
}

/// A single budget line. Entries are never edited in place: applying a
/// scenario replaces the whole entry with a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetEntry {
    pub category: String,
    pub amount: f64,
    pub year: i32,
    pub periodicity: Periodicity,
}

// Scenario models

/// The typed change a scenario applies to its target category.
///
/// `Percentage` values are 0-1 fractions, never 0-100 percentages.
/// `DeferralMonths` counts whole months within the 12-month budget cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioChange {
    Percentage(f64),
    FixedDelta(f64),
    DeferralMonths(u32),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub target_category: String,
    pub change: ScenarioChange,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The signed monetary effect of a scenario on one budget row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetDelta {
    pub category: String,
    pub old_amount: f64,
    pub new_amount: f64,
    pub delta: f64,
}

impl BudgetDelta {
    /// Change relative to the old amount, as a 0-100 percentage.
    /// A change from zero is reported as +/-100.
    pub fn percentage_change(&self) -> f64 {
        if self.old_amount == 0.0 {
            if self.delta > 0.0 {
                100.0
            } else if self.delta < 0.0 {
                -100.0
            } else {
                0.0
            }
        } else {
            self.delta / self.old_amount * 100.0
        }
    }
}

// Funding constraint models

/// One funding source as declared in the constraints file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundingSource {
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub note: Option<String>,
}

// Strategic goal models

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    Performance,
    Equity,
    Access,
    Efficiency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Horizon {
    #[serde(rename = "short-term")]
    ShortTerm,
    #[serde(rename = "medium-term")]
    MediumTerm,
    #[serde(rename = "long-term")]
    LongTerm,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategicGoal {
    pub category: String,
    pub objective: String,
    pub priority: Priority,
    pub goal_type: GoalType,
    pub horizon: Horizon,
}

// Forecast models

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub category: String,
    pub forecasted_amount: f64,
    pub confidence_interval: ConfidenceInterval,
}

impl ForecastResult {
    /// Zero-filled result for a category with no historical series.
    /// Treated as "no information", not an error.
    pub fn no_information(category: &str) -> Self {
        ForecastResult {
            category: category.to_string(),
            forecasted_amount: 0.0,
            confidence_interval: ConfidenceInterval {
                lower: 0.0,
                upper: 0.0,
            },
        }
    }

    pub fn is_informative(&self) -> bool {
        self.forecasted_amount != 0.0
            || self.confidence_interval.lower != 0.0
            || self.confidence_interval.upper != 0.0
    }
}

/// One row of the historical budget time-series table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSeriesEntry {
    pub start_date: NaiveDate,
    pub category: String,
    pub amount: f64,
}

// Analysis output models

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    pub category: String,
    pub insight: String,
    pub impact: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OffsetRecommendation {
    pub category: String,
    pub offset_amount: String,
    pub rationale: String,
    pub impact: String,
    pub implementation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeOff {
    pub category: String,
    pub tradeoff: String,
    pub impact: String,
    pub risk_level: String,
    pub mitigation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeSummary {
    pub scenario_id: String,
    pub executive_summary: String,
    pub key_findings: Vec<String>,
    pub recommendations: Vec<String>,
    pub strategic_implications: Vec<String>,
    pub narrative: String,
}

impl NarrativeSummary {
    /// Best-effort summary returned when a scenario could not be analyzed.
    /// The pipeline always hands the caller a narrative, never a raw error.
    pub fn failure(scenario_id: &str, reason: &str) -> Self {
        NarrativeSummary {
            scenario_id: scenario_id.to_string(),
            executive_summary: format!("Error processing scenario: {reason}"),
            key_findings: vec!["Analysis could not be completed due to errors".to_string()],
            recommendations: vec!["Please review the scenario manually".to_string()],
            strategic_implications: vec!["Error in analysis pipeline".to_string()],
            narrative: format!("The analysis pipeline encountered an error: {reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_change() {
        let delta = BudgetDelta {
            category: "Math Teachers".to_string(),
            old_amount: 240_000.0,
            new_amount: 252_000.0,
            delta: 12_000.0,
        };
        assert!((delta.percentage_change() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_percentage_change_from_zero() {
        let up = BudgetDelta {
            category: "New Program".to_string(),
            old_amount: 0.0,
            new_amount: 5_000.0,
            delta: 5_000.0,
        };
        assert_eq!(up.percentage_change(), 100.0);

        let flat = BudgetDelta {
            category: "New Program".to_string(),
            old_amount: 0.0,
            new_amount: 0.0,
            delta: 0.0,
        };
        assert_eq!(flat.percentage_change(), 0.0);
    }

    #[test]
    fn test_periodicity_from_label() {
        assert_eq!(Periodicity::from_label("Annual"), Some(Periodicity::Annual));
        assert_eq!(
            Periodicity::from_label("Quarterly"),
            Some(Periodicity::Quarterly)
        );
        assert_eq!(Periodicity::from_label("annual"), None);
        assert_eq!(Periodicity::from_label("Weekly"), None);
    }

    #[test]
    fn test_goal_deserializes_lowercase_enums() {
        let raw = r#"{
            "category": "Math Teachers",
            "objective": "Improve proficiency",
            "priority": "high",
            "goal_type": "performance",
            "horizon": "long-term"
        }"#;
        let goal: StrategicGoal = serde_json::from_str(raw).unwrap();
        assert_eq!(goal.priority, Priority::High);
        assert_eq!(goal.goal_type, GoalType::Performance);
        assert_eq!(goal.horizon, Horizon::LongTerm);
    }

    #[test]
    fn test_no_information_forecast() {
        let f = ForecastResult::no_information("Smartboards");
        assert!(!f.is_informative());
        assert_eq!(f.forecasted_amount, 0.0);
    }
}
