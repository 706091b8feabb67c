use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::error::{ApiError, Result};
use pipeline::Orchestrator;

/// The orchestrator drives one scenario at a time against a single shared
/// budget store, so API calls are serialized behind a mutex. Concurrent
/// evaluation would need an independently snapshotted store per request.
pub type OrchestratorState = Arc<Mutex<Orchestrator>>;

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// GET /api/scenarios
/// Lists the ids of every loaded scenario.
pub async fn list_scenarios(State(state): State<OrchestratorState>) -> Result<impl IntoResponse> {
    let ids = lock(&state)?.scenario_ids();
    Ok(Json(ids))
}

/// POST /api/scenarios/:id/analyze
/// Runs one scenario and returns its narrative summary. Analysis failures
/// come back as a failure narrative with status 200; only an unknown id
/// is a 404.
pub async fn analyze_scenario(
    State(state): State<OrchestratorState>,
    Path(scenario_id): Path<String>,
) -> Result<impl IntoResponse> {
    if !lock(&state)?.scenario_ids().contains(&scenario_id) {
        return Err(ApiError::ScenarioNotFound(scenario_id));
    }

    // The pipeline blocks on the chat collaborator, so keep it off the
    // async runtime.
    let summary = tokio::task::spawn_blocking(move || {
        let mut orchestrator = lock(&state)?;
        Ok::<_, ApiError>(orchestrator.process_scenario(&scenario_id))
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(summary))
}

/// POST /api/scenarios/analyze-all
/// Runs every scenario and returns the narratives keyed by scenario id.
pub async fn analyze_all(State(state): State<OrchestratorState>) -> Result<impl IntoResponse> {
    let results = tokio::task::spawn_blocking(move || {
        let mut orchestrator = lock(&state)?;
        Ok::<_, ApiError>(orchestrator.process_all_scenarios())
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(results))
}

fn lock(state: &OrchestratorState) -> Result<std::sync::MutexGuard<'_, Orchestrator>> {
    state
        .lock()
        .map_err(|_| ApiError::Internal("orchestrator lock poisoned".to_string()))
}
