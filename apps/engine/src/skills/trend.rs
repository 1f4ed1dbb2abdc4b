//! Trend prediction: qualitative demand outlook for a single skill.
//! LLM-backed with a fixed fallback payload.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm_client::{complete_json, AvailabilityGate, LlmError};
use crate::skills::prompts::TREND_PREDICTION_PROMPT;

const TREND_SYSTEM: &str = crate::llm_client::prompts::JSON_ONLY_SYSTEM;

const FALLBACK_TREND: &str = "Growing";
const FALLBACK_SCORE: u32 = 85;
const FALLBACK_REASON: &str =
    "Baseline estimate: live market analysis is unavailable, so a default growth outlook is reported.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPrediction {
    pub skill: String,
    pub trend: String,
    pub score: u32,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTrend {
    trend: String,
    score: f64,
    reason: String,
}

/// Predicts the trend for `skill`. Never fails: LLM problems degrade to the fixed payload.
pub async fn predict_trend(skill: &str, gate: &AvailabilityGate) -> TrendPrediction {
    let reason = match gate.generator() {
        Some(generator) => {
            let prompt = TREND_PREDICTION_PROMPT.replace("{skill}", skill);
            let result = complete_json::<RawTrend>(generator, &prompt, TREND_SYSTEM)
                .await
                .and_then(validate_trend);
            match result {
                Ok((trend, score, reason)) => {
                    return TrendPrediction {
                        skill: skill.to_string(),
                        trend,
                        score,
                        reason,
                        warning: None,
                    }
                }
                Err(e) => format!("LLM request failed: {e}"),
            }
        }
        None => gate.unavailable_reason().unwrap_or_default(),
    };

    warn!("Trend prediction for '{skill}' served from fallback: {reason}");
    fallback_prediction(skill, reason)
}

fn fallback_prediction(skill: &str, reason: String) -> TrendPrediction {
    TrendPrediction {
        skill: skill.to_string(),
        trend: FALLBACK_TREND.to_string(),
        score: FALLBACK_SCORE,
        reason: FALLBACK_REASON.to_string(),
        warning: Some(format!("Fallback trend prediction used: {reason}")),
    }
}

/// Requires a non-empty trend label and a finite score; clamps the score to 0..=100.
fn validate_trend(raw: RawTrend) -> Result<(String, u32, String), LlmError> {
    let trend = raw.trend.trim();
    if trend.is_empty() {
        return Err(LlmError::Schema("'trend' must not be empty".to_string()));
    }
    if !raw.score.is_finite() {
        return Err(LlmError::Schema("'score' must be a finite number".to_string()));
    }
    let score = raw.score.round().clamp(0.0, 100.0) as u32;
    Ok((trend.to_string(), score, raw.reason.trim().to_string()))
}
