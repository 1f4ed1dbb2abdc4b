//! Mentor: conversational career assistant behind a fixed persona.
//!
//! Gate closed → canned offline reply. LLM failure → canned persona reply.
//! Both carry a `warning` so callers can tell them apart from a live answer.

pub mod handlers;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm_client::{AvailabilityGate, ChatTurn, Role};

/// Only the most recent turns are replayed to the model.
const MAX_HISTORY_TURNS: usize = 10;

pub const MENTOR_SYSTEM: &str = "\
You are MentorBot, the friendly and pragmatic career mentor of the Skill Evolution platform. \
Give concise, actionable advice about skills to learn, career moves, resumes and interviews. \
Keep answers under 150 words unless the user asks for detail. \
Recommend concrete next steps and learning resources where useful. \
If a question is unrelated to careers, skills or learning, politely steer the conversation back.";

const OFFLINE_REPLY: &str = "I'm currently offline, so I can't give personalised advice right now. \
    In the meantime, review the skill trends on your dashboard and pick one in-demand skill to practise this week.";

const DEGRADED_REPLY: &str = "I'm having trouble thinking that through right now. \
    A good next step is usually to strengthen one core skill with a small project you can show on your resume. \
    Please ask me again in a moment.";

/// A prior message as sent by the client. `text` is accepted as an alias of `content`.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, alias = "text")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MentorReply {
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Answers `message` in the context of `history`. Never fails.
pub async fn mentor_reply(
    message: &str,
    history: &[HistoryMessage],
    gate: &AvailabilityGate,
) -> MentorReply {
    let Some(generator) = gate.generator() else {
        let reason = gate.unavailable_reason().unwrap_or_default();
        warn!("Mentor chat offline: {reason}");
        return MentorReply {
            response: OFFLINE_REPLY.to_string(),
            warning: Some(format!("Mentor is offline: {reason}")),
        };
    };

    let mut turns = normalize_history(history);
    turns.push(ChatTurn::user(message));
    let turns = merge_consecutive(turns);

    match generator.converse(MENTOR_SYSTEM, &turns).await {
        Ok(text) if !text.trim().is_empty() => MentorReply {
            response: text.trim().to_string(),
            warning: None,
        },
        Ok(_) => degraded("LLM returned empty content".to_string()),
        Err(e) => degraded(format!("LLM request failed: {e}")),
    }
}

fn degraded(reason: String) -> MentorReply {
    warn!("Mentor chat degraded: {reason}");
    MentorReply {
        response: DEGRADED_REPLY.to_string(),
        warning: Some(format!("Fallback mentor reply used: {reason}")),
    }
}

/// Keeps the last `MAX_HISTORY_TURNS` non-empty messages and maps client roles:
/// `user` stays user, anything else (`bot`, `model`, `assistant`, ...) is the assistant.
/// Leading assistant turns are dropped since a conversation must open with the user.
pub fn normalize_history(history: &[HistoryMessage]) -> Vec<ChatTurn> {
    let turns: Vec<ChatTurn> = history
        .iter()
        .filter_map(|m| {
            let content = m.content.as_deref()?.trim();
            if content.is_empty() {
                return None;
            }
            let role = match m.role.as_deref().map(str::trim) {
                Some(r) if r.eq_ignore_ascii_case("user") => Role::User,
                _ => Role::Assistant,
            };
            Some(ChatTurn {
                role,
                content: content.to_string(),
            })
        })
        .collect();

    let start = turns.len().saturating_sub(MAX_HISTORY_TURNS);
    turns
        .into_iter()
        .skip(start)
        .skip_while(|t| t.role == Role::Assistant)
        .collect()
}

/// Joins adjacent same-role turns so roles strictly alternate.
fn merge_consecutive(turns: Vec<ChatTurn>) -> Vec<ChatTurn> {
    let mut merged: Vec<ChatTurn> = Vec::with_capacity(turns.len());
    for turn in turns {
        match merged.last_mut() {
            Some(last) if last.role == turn.role => {
                last.content.push_str("\n\n");
                last.content.push_str(&turn.content);
            }
            _ => merged.push(turn),
        }
    }
    merged
}
