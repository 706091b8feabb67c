use std::env;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use ai_client::{OllamaClient, OllamaClientConfig};
use api::run_server;
use pipeline::{Orchestrator, PipelinePaths};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse environment variables (with sane defaults)
    let data_dir = PathBuf::from(env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()));
    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8000".to_string())
        .parse()
        .unwrap_or(8000);

    let paths = PipelinePaths {
        funding_constraints: data_dir.join("funding_constraints.json"),
        scenarios: data_dir.join("scenario_list.json"),
        strategic_goals: data_dir.join("strategic_goals.json"),
        snapshot_budget: data_dir.join("snapshot_budget.csv"),
        timeseries_budget: data_dir.join("timeseries_budget.csv"),
    };

    println!("Budget Scenario API Server");
    println!("==========================");
    println!("Data dir: {}", data_dir.display());
    println!("Listening on: {}:{}", host, port);

    // Pre-flight check: the orchestrator loads every input up front, so a
    // bad data directory fails here rather than on the first request.
    let model = OllamaClient::new(OllamaClientConfig::from_env())?;
    let orchestrator = Orchestrator::new(&paths, Arc::new(model))?;
    let state = Arc::new(Mutex::new(orchestrator));

    run_server(state, &host, port).await?;

    Ok(())
}
