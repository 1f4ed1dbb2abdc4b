use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;

use crate::errors::{require_field, AppError};
use crate::mentor::{mentor_reply, HistoryMessage, MentorReply};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub history: Vec<HistoryMessage>,
}

/// POST /chat
pub async fn handle_chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<MentorReply>, AppError> {
    let Json(request) = payload?;
    let message = require_field(request.message, "message")?;
    Ok(Json(mentor_reply(&message, &request.history, &state.gate).await))
}
