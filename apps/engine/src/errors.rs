use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::forecast::ForecastError;
use crate::jobs::JobSearchError;
use crate::sentiment::SentimentError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Collaborator failures that have a deterministic fallback never become an
/// `AppError`; they surface as a degraded response carrying a `warning` field.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Forecast failed: {0}")]
    ForecastFailure(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::InsufficientData(msg) => {
                (StatusCode::BAD_REQUEST, "INSUFFICIENT_DATA", msg.clone())
            }
            AppError::EmptyInput(msg) => (StatusCode::BAD_REQUEST, "EMPTY_INPUT", msg.clone()),
            AppError::ForecastFailure(msg) => {
                tracing::warn!("Forecast failure: {msg}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "FORECAST_FAILURE",
                    msg.clone(),
                )
            }
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", msg.clone())
            }
            AppError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
                msg.clone(),
            ),
            AppError::Upstream(msg) => {
                tracing::error!("Upstream error: {msg}");
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", msg.clone())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    format!("{e:#}"),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return AppError::PayloadTooLarge(rejection.body_text());
        }
        AppError::Validation(format!("Invalid JSON body: {}", rejection.body_text()))
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::Validation(format!("Expected a multipart upload: {}", rejection.body_text()))
    }
}

impl From<ForecastError> for AppError {
    fn from(err: ForecastError) -> Self {
        match err {
            ForecastError::InsufficientData { .. } => AppError::InsufficientData(err.to_string()),
            ForecastError::InvalidHorizon(_) => AppError::Validation(err.to_string()),
            ForecastError::Failure(_) => AppError::ForecastFailure(err.to_string()),
        }
    }
}

impl From<SentimentError> for AppError {
    fn from(err: SentimentError) -> Self {
        match err {
            SentimentError::EmptyInput => AppError::EmptyInput(err.to_string()),
        }
    }
}

impl From<JobSearchError> for AppError {
    fn from(err: JobSearchError) -> Self {
        match err {
            JobSearchError::NotConfigured => AppError::ServiceUnavailable(err.to_string()),
            other => AppError::Upstream(other.to_string()),
        }
    }
}

/// Returns the trimmed value of a required string field, or a validation error naming it.
pub fn require_field(value: Option<String>, field: &str) -> Result<String, AppError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(format!("'{field}' is required")))
}
