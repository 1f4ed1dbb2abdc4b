use axum::{extract::rejection::JsonRejection, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::sentiment::{analyze, SentimentResult};

#[derive(Debug, Default, Deserialize)]
pub struct SentimentRequest {
    #[serde(default)]
    pub text: Option<String>,
}

/// POST /analyze-sentiment
pub async fn handle_analyze_sentiment(
    payload: Result<Json<SentimentRequest>, JsonRejection>,
) -> Result<Json<SentimentResult>, AppError> {
    let Json(request) = payload?;
    let result = analyze(request.text.as_deref().unwrap_or_default())?;
    Ok(Json(result))
}
