use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{self, OrchestratorState};

/// Create the main application router with all API endpoints
pub fn create_router(state: OrchestratorState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Scenario endpoints
        .route("/api/scenarios", get(handlers::list_scenarios))
        .route(
            "/api/scenarios/:id/analyze",
            post(handlers::analyze_scenario),
        )
        .route("/api/scenarios/analyze-all", post(handlers::analyze_all))
        // Add shared state
        .with_state(state)
        // Add middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
