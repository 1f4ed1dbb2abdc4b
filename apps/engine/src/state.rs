use std::sync::Arc;

use crate::config::Config;
use crate::jobs::JobSearchClient;
use crate::llm_client::AvailabilityGate;
use crate::skills::SkillTaxonomy;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Decided once at startup; every LLM-backed tier consults it per request.
    pub gate: AvailabilityGate,
    pub taxonomy: Arc<SkillTaxonomy>,
    pub jobs: JobSearchClient,
    pub config: Config,
}
