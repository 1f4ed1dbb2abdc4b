use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    /// The taxonomy tier is always loaded once the server is up.
    pub nlp_pipeline_loaded: bool,
    pub llm_active: bool,
    pub llm_configured: bool,
    pub llm_status: &'static str,
    pub taxonomy_size: usize,
    pub jobs_configured: bool,
}

/// GET /health
/// Reports liveness and which tiers are active. Never fails.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        nlp_pipeline_loaded: !state.taxonomy.is_empty(),
        llm_active: state.gate.is_live(),
        llm_configured: state.gate.credential_configured(),
        llm_status: state.gate.status_label(),
        taxonomy_size: state.taxonomy.len(),
        jobs_configured: state.jobs.is_configured(),
    })
}
