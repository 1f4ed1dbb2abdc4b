//! Axum route handlers for the Skill Intelligence API.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{rejection::JsonRejection, Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{require_field, AppError};
use crate::extraction::{extract_staged, StagedDocument};
use crate::skills::analyzer::analyze_resume;
use crate::skills::relations::{related_skills, RelatedSkills};
use crate::skills::trend::{predict_trend, TrendPrediction};
use crate::skills::{AnalysisSource, ResumeAnalysis};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ExtractSkillsRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SkillRequest {
    #[serde(default)]
    pub skill: Option<String>,
}

/// `ResumeAnalysis` keys at the top level, plus which tier produced them.
#[derive(Debug, Serialize)]
pub struct ResumeAnalysisResponse {
    #[serde(flatten)]
    pub analysis: ResumeAnalysis,
    pub source: AnalysisSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// An uploaded file pulled out of a multipart body.
struct Upload {
    filename: Option<String>,
    bytes: bytes::Bytes,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /parse-resume
///
/// Multipart upload (field `file`). Stages the document, extracts its text and
/// runs the tiered analyzer. The staged file is gone before the response is built.
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ResumeAnalysisResponse>, AppError> {
    let upload = read_upload(multipart?).await?;
    if upload.bytes.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }

    let staged = StagedDocument::stage(&upload.bytes, upload.filename.as_deref())
        .map_err(|e| AppError::Internal(anyhow::Error::new(e).context("Failed to stage upload")))?;
    let text = extract_staged(&staged).await;
    drop(staged);

    info!("Extracted {} characters from uploaded resume", text.len());

    let outcome = analyze_resume(&text, &state.gate, &state.taxonomy).await;
    let warning = outcome.warning();
    Ok(Json(ResumeAnalysisResponse {
        analysis: outcome.analysis,
        source: outcome.source,
        warning,
    }))
}

/// POST /extract-skills
///
/// Raw text through the taxonomy tier only.
pub async fn handle_extract_skills(
    State(state): State<AppState>,
    payload: Result<Json<ExtractSkillsRequest>, JsonRejection>,
) -> Result<Json<ResumeAnalysisResponse>, AppError> {
    let Json(request) = payload?;
    let text = require_field(request.text, "text")?;

    Ok(Json(ResumeAnalysisResponse {
        analysis: state.taxonomy.analyze(&text),
        source: AnalysisSource::Taxonomy,
        warning: None,
    }))
}

/// POST /predict-trend
pub async fn handle_predict_trend(
    State(state): State<AppState>,
    payload: Result<Json<SkillRequest>, JsonRejection>,
) -> Result<Json<TrendPrediction>, AppError> {
    let Json(request) = payload?;
    let skill = require_field(request.skill, "skill")?;
    Ok(Json(predict_trend(&skill, &state.gate).await))
}

/// POST /semantic-skills
pub async fn handle_semantic_skills(
    State(state): State<AppState>,
    payload: Result<Json<SkillRequest>, JsonRejection>,
) -> Result<Json<RelatedSkills>, AppError> {
    let Json(request) = payload?;
    let skill = require_field(request.skill, "skill")?;
    Ok(Json(related_skills(&skill, &state.gate).await))
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Invalid multipart body", e))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error("Failed to read upload", e))?;
        return Ok(Upload { filename, bytes });
    }
    Err(AppError::Validation("No file uploaded".to_string()))
}

fn multipart_error(context: &str, err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::Validation(format!("{context}: {}", err.body_text()))
    }
}
