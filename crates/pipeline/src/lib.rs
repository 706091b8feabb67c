//! Orchestrates one scenario at a time against the shared budget store:
//! snapshot, apply, forecast, agent analysis, narrative, restore. The
//! snapshot/restore discipline, not locking, is what keeps scenarios
//! independent; every post-snapshot exit path restores the baseline.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use agents::{InsightGenerator, NarrativeGenerator, OffsetAdvisor, TradeOffEvaluator};
use ai_client::ChatModel;
use anyhow::{Context, Result};
use budget::{apply_scenario, BudgetStore, ConstraintRegistry, Snapshot};
use forecast::CostForecaster;
use loaders::ScenarioList;
use models::{NarrativeSummary, Scenario, StrategicGoal};
use tracing::{info, warn};

/// Locations of the five persisted configuration inputs.
#[derive(Debug, Clone)]
pub struct PipelinePaths {
    pub funding_constraints: PathBuf,
    pub scenarios: PathBuf,
    pub strategic_goals: PathBuf,
    pub snapshot_budget: PathBuf,
    pub timeseries_budget: PathBuf,
}

pub struct Orchestrator {
    scenarios: ScenarioList,
    registry: ConstraintRegistry,
    store: BudgetStore,
    forecaster: CostForecaster,
    goals: Vec<StrategicGoal>,
    insight_generator: InsightGenerator,
    offset_advisor: OffsetAdvisor,
    tradeoff_evaluator: TradeOffEvaluator,
    narrative_generator: NarrativeGenerator,
}

impl Orchestrator {
    /// Loads every input. Malformed or missing constraint, goal or budget
    /// files are fatal here; a missing time-series table only degrades
    /// forecasts.
    pub fn new(paths: &PipelinePaths, model: Arc<dyn ChatModel>) -> Result<Self> {
        let registry = loaders::load_funding_constraints(&paths.funding_constraints)
            .context("Loading funding constraints")?;
        let scenarios = ScenarioList::load(&paths.scenarios).context("Loading scenario list")?;
        let goals = loaders::load_strategic_goals(&paths.strategic_goals)
            .context("Loading strategic goals")?;
        let store =
            loaders::load_budget_table(&paths.snapshot_budget).context("Loading budget table")?;
        let forecaster = CostForecaster::from_csv_or_empty(&paths.timeseries_budget);

        info!(
            scenarios = scenarios.len(),
            budget_rows = store.len(),
            goals = goals.len(),
            "pipeline inputs loaded"
        );
        Ok(Self::from_parts(
            scenarios, registry, store, forecaster, goals, model,
        ))
    }

    /// Assembles an orchestrator from already-loaded components.
    pub fn from_parts(
        scenarios: ScenarioList,
        registry: ConstraintRegistry,
        store: BudgetStore,
        forecaster: CostForecaster,
        goals: Vec<StrategicGoal>,
        model: Arc<dyn ChatModel>,
    ) -> Self {
        let insight_generator = InsightGenerator::new(model.clone());
        let offset_advisor = OffsetAdvisor::new(model.clone(), registry.notes().to_vec());
        let tradeoff_evaluator = TradeOffEvaluator::new(model.clone());
        let narrative_generator = NarrativeGenerator::new(model);
        Orchestrator {
            scenarios,
            registry,
            store,
            forecaster,
            goals,
            insight_generator,
            offset_advisor,
            tradeoff_evaluator,
            narrative_generator,
        }
    }

    pub fn scenario_ids(&self) -> Vec<String> {
        self.scenarios.ids()
    }

    pub fn budget(&self) -> &BudgetStore {
        &self.store
    }

    /// Runs one scenario end to end and always returns a narrative: a
    /// failure at any step becomes a best-effort failure summary instead
    /// of an error. The store is back at its baseline when this returns.
    pub fn process_scenario(&mut self, scenario_id: &str) -> NarrativeSummary {
        info!(scenario_id, "processing scenario");

        // Failures before the snapshot need no restoration.
        let scenario = match self.scenarios.get(scenario_id) {
            Ok(scenario) => scenario,
            Err(e) => {
                warn!(scenario_id, error = %e, "scenario failed to load");
                return NarrativeSummary::failure(scenario_id, &e.to_string());
            }
        };
        let snapshot = match Snapshot::capture(&self.store) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(scenario_id, error = %e, "snapshot capture failed");
                return NarrativeSummary::failure(scenario_id, &e.to_string());
            }
        };

        let outcome = self.analyze(&scenario);

        // Exactly one restore per processed scenario, on both paths.
        snapshot.restore(&mut self.store);

        match outcome {
            Ok(summary) => summary,
            Err(e) => {
                warn!(scenario_id, error = %e, "scenario analysis failed");
                NarrativeSummary::failure(scenario_id, &e.to_string())
            }
        }
    }

    /// Runs every scenario against the same baseline and returns the
    /// narratives keyed by scenario id. One scenario's failure never
    /// prevents the others from being attempted.
    pub fn process_all_scenarios(&mut self) -> BTreeMap<String, NarrativeSummary> {
        let ids = self.scenario_ids();
        info!(count = ids.len(), "processing all scenarios");
        ids.iter()
            .map(|id| (id.clone(), self.process_scenario(id)))
            .collect()
    }

    fn analyze(&mut self, scenario: &Scenario) -> budget::Result<NarrativeSummary> {
        let deltas = apply_scenario(scenario, &self.registry, &mut self.store)?;
        let forecasts = self.forecaster.forecast_deltas(&deltas);
        let insights = self
            .insight_generator
            .generate(&forecasts, &deltas, &self.goals);
        let offsets = self.offset_advisor.recommend(&deltas, &self.goals);
        let current_budget = self.store.amounts_by_category();
        let tradeoffs = self
            .tradeoff_evaluator
            .evaluate(&deltas, &self.goals, &current_budget);
        Ok(self.narrative_generator.generate(
            scenario, &insights, &offsets, &tradeoffs, &self.goals,
        ))
    }
}

/// Renders the batch results as the human-readable stdout report.
pub fn render_report(results: &BTreeMap<String, NarrativeSummary>) -> String {
    let mut out = String::new();
    for result in results.values() {
        let _ = writeln!(out, "{}", "=".repeat(80));
        let _ = writeln!(out, "Scenario {} Analysis", result.scenario_id);
        let _ = writeln!(out, "{}", "=".repeat(80));

        let _ = writeln!(out, "\nExecutive Summary:\n{}", "-".repeat(40));
        let _ = writeln!(out, "{}", result.executive_summary);

        let _ = writeln!(out, "\nKey Findings:\n{}", "-".repeat(40));
        for finding in &result.key_findings {
            let _ = writeln!(out, "- {finding}");
        }

        let _ = writeln!(out, "\nRecommendations:\n{}", "-".repeat(40));
        for recommendation in &result.recommendations {
            let _ = writeln!(out, "- {recommendation}");
        }

        let _ = writeln!(out, "\nStrategic Implications:\n{}", "-".repeat(40));
        for implication in &result.strategic_implications {
            let _ = writeln!(out, "- {implication}");
        }

        let _ = writeln!(out, "\nDetailed Analysis:\n{}", "-".repeat(40));
        let _ = writeln!(out, "{}\n", result.narrative);
    }
    out
}
