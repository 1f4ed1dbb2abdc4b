use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::{require_field, AppError};
use crate::jobs::{JobListing, DEFAULT_LOCATION};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct JobsQuery {
    pub skill: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JobsResponse {
    pub jobs: Vec<JobListing>,
}

/// GET /jobs?skill=&location=
pub async fn handle_jobs(
    State(state): State<AppState>,
    Query(params): Query<JobsQuery>,
) -> Result<Json<JobsResponse>, AppError> {
    let skill = require_field(params.skill, "skill")?;
    let location = params
        .location
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| DEFAULT_LOCATION.to_string());

    let jobs = state.jobs.search(&skill, &location).await?;
    Ok(Json(JobsResponse { jobs }))
}
