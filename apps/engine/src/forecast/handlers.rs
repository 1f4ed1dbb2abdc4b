use axum::{extract::rejection::JsonRejection, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::forecast::{forecast, resolve_horizon, to_series, DemandPoint, HistoryEntry};

#[derive(Debug, Default, Deserialize)]
pub struct ForecastRequest {
    #[serde(default)]
    pub skill: Option<String>,
    #[serde(default)]
    pub history: Option<Vec<HistoryEntry>>,
    #[serde(default)]
    pub horizon: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill: Option<String>,
    pub forecast: Vec<DemandPoint>,
}

/// POST /forecast
///
/// Fits the damped-trend model to `history` and projects `horizon` years.
/// The fit is CPU-bound and runs on the blocking pool.
pub async fn handle_forecast(
    payload: Result<Json<ForecastRequest>, JsonRejection>,
) -> Result<Json<ForecastResponse>, AppError> {
    let Json(request) = payload?;
    let history = request
        .history
        .ok_or_else(|| AppError::Validation("'history' is required".to_string()))?;
    let horizon = resolve_horizon(request.horizon)?;
    let series = to_series(&history);

    let projected = tokio::task::spawn_blocking(move || forecast(&series, horizon))
        .await
        .map_err(|e| AppError::Internal(anyhow::Error::new(e).context("Forecast task failed")))??;

    Ok(Json(ForecastResponse {
        skill: request.skill,
        forecast: projected,
    }))
}
