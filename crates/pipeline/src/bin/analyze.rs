use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use ai_client::{OllamaClient, OllamaClientConfig};
use anyhow::{Context, Result};
use clap::Parser;
use pipeline::{render_report, Orchestrator, PipelinePaths};

/// Runs what-if budget scenarios against the district budget and prints a
/// narrative report per scenario.
#[derive(Debug, Parser)]
#[command(name = "analyze-scenarios", version, about = "Simulate what-if budget scenarios", long_about = None)]
struct Args {
    /// Path to the funding constraints file
    #[arg(long, default_value = "data/funding_constraints.json")]
    funding_constraints: PathBuf,

    /// Path to the scenario list file
    #[arg(long, default_value = "data/scenario_list.json")]
    scenarios: PathBuf,

    /// Path to the strategic goals file
    #[arg(long, default_value = "data/strategic_goals.json")]
    strategic_goals: PathBuf,

    /// Path to the snapshot budget table
    #[arg(long, default_value = "data/snapshot_budget.csv")]
    snapshot_budget: PathBuf,

    /// Path to the historical budget time-series table
    #[arg(long, default_value = "data/timeseries_budget.csv")]
    timeseries_budget: PathBuf,

    /// Analyze a single scenario id instead of the whole list
    #[arg(short, long)]
    scenario: Option<String>,

    /// Also write the results as JSON to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pipeline=info,agents=info,forecast=info".into()),
        )
        .init();

    let args = Args::parse();
    let paths = PipelinePaths {
        funding_constraints: args.funding_constraints,
        scenarios: args.scenarios,
        strategic_goals: args.strategic_goals,
        snapshot_budget: args.snapshot_budget,
        timeseries_budget: args.timeseries_budget,
    };

    let model = OllamaClient::new(OllamaClientConfig::from_env())
        .context("Building Ollama client")?;
    let mut orchestrator = Orchestrator::new(&paths, Arc::new(model))?;

    let results = match &args.scenario {
        Some(id) => BTreeMap::from([(id.clone(), orchestrator.process_scenario(id))]),
        None => orchestrator.process_all_scenarios(),
    };

    if let Some(path) = &args.output {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Creating output dir: {}", parent.display()))?;
        }
        let json = if args.pretty {
            serde_json::to_string_pretty(&results)?
        } else {
            serde_json::to_string(&results)?
        };
        fs::write(path, json)
            .with_context(|| format!("Writing output file: {}", path.display()))?;
    }

    print!("{}", render_report(&results));
    Ok(())
}
