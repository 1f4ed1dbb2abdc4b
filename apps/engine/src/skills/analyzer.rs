//! Structured Resume Analyzer: orchestrates the optional LLM tier and the
//! rule-based fallback as an explicit state machine.
//!
//! ```text
//! Start ──gate closed / no text──▶ Fallback ──▶ Done(taxonomy)
//!   │
//!   └──gate live──▶ LlmAttempt ──valid JSON──▶ Done(llm)
//!                        └──any failure──▶ Fallback ──▶ Done(taxonomy)
//! ```
//!
//! A single attempt is made against the LLM. Every failure class (transport,
//! API status, unparseable output, schema violation) lands in `Fallback`, so
//! the caller always receives a well-formed `ResumeAnalysis`.

use std::collections::BTreeSet;
use std::fmt;

use serde_json::Value;
use tracing::{info, warn};

use crate::llm_client::{complete_json, AvailabilityGate, LlmError, TextGenerator};
use crate::skills::prompts::{RESUME_ANALYSIS_PROMPT, RESUME_ANALYSIS_SYSTEM};
use crate::skills::{
    AnalysisSource, ResumeAnalysis, SkillTaxonomy, PLACEHOLDER_ROLE, PLACEHOLDER_SENIORITY,
};

/// Resume text beyond this many characters is not sent to the LLM.
const MAX_PROMPT_CHARS: usize = 12_000;

/// Why the analyzer degraded to the taxonomy tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    GateClosed(String),
    NoText,
    Backend(String),
    InvalidOutput(String),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::GateClosed(reason) => write!(f, "{reason}"),
            FallbackReason::NoText => f.write_str("no text could be extracted from the document"),
            FallbackReason::Backend(e) => write!(f, "LLM request failed: {e}"),
            FallbackReason::InvalidOutput(e) => write!(f, "LLM returned an invalid analysis: {e}"),
        }
    }
}

/// Final result of one analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub analysis: ResumeAnalysis,
    pub source: AnalysisSource,
    pub fallback_reason: Option<FallbackReason>,
}

impl AnalysisOutcome {
    /// Warning text for degraded responses, `None` when the LLM tier answered.
    pub fn warning(&self) -> Option<String> {
        self.fallback_reason
            .as_ref()
            .map(|reason| format!("Rule-based skill extraction used: {reason}"))
    }
}

enum AnalyzerState<'a> {
    Start,
    LlmAttempt(&'a dyn TextGenerator),
    Fallback(FallbackReason),
    Done(AnalysisOutcome),
}

/// Runs the tiered analysis over already-extracted text.
pub async fn analyze_resume(
    text: &str,
    gate: &AvailabilityGate,
    taxonomy: &SkillTaxonomy,
) -> AnalysisOutcome {
    let mut state = AnalyzerState::Start;
    loop {
        state = match state {
            AnalyzerState::Start => match gate.generator() {
                None => AnalyzerState::Fallback(FallbackReason::GateClosed(
                    gate.unavailable_reason().unwrap_or_default(),
                )),
                Some(_) if text.trim().is_empty() => {
                    AnalyzerState::Fallback(FallbackReason::NoText)
                }
                Some(generator) => AnalyzerState::LlmAttempt(generator),
            },
            AnalyzerState::LlmAttempt(generator) => match attempt_llm(text, generator).await {
                Ok(analysis) => {
                    info!(
                        "LLM resume analysis: {} technical, {} soft skills",
                        analysis.technical_skills.len(),
                        analysis.soft_skills.len()
                    );
                    AnalyzerState::Done(AnalysisOutcome {
                        analysis,
                        source: AnalysisSource::Llm,
                        fallback_reason: None,
                    })
                }
                Err(reason) => AnalyzerState::Fallback(reason),
            },
            AnalyzerState::Fallback(reason) => {
                warn!("Resume analysis degraded to taxonomy tier: {reason}");
                AnalyzerState::Done(AnalysisOutcome {
                    analysis: taxonomy.analyze(text),
                    source: AnalysisSource::Taxonomy,
                    fallback_reason: Some(reason),
                })
            }
            AnalyzerState::Done(outcome) => return outcome,
        };
    }
}

async fn attempt_llm(
    text: &str,
    generator: &dyn TextGenerator,
) -> Result<ResumeAnalysis, FallbackReason> {
    let prompt =
        RESUME_ANALYSIS_PROMPT.replace("{resume_text}", truncate_chars(text, MAX_PROMPT_CHARS));
    let raw: Value = complete_json(generator, &prompt, RESUME_ANALYSIS_SYSTEM)
        .await
        .map_err(|e| match e {
            LlmError::Parse(_) | LlmError::EmptyContent | LlmError::Schema(_) => {
                FallbackReason::InvalidOutput(e.to_string())
            }
            other => FallbackReason::Backend(other.to_string()),
        })?;
    validate_analysis(&raw).map_err(|e| FallbackReason::InvalidOutput(e.to_string()))
}

/// Treats LLM output as untrusted: all four keys must be present with the right
/// value kinds. Light repairs are applied (trimming, dropping blank entries,
/// placeholder for a blank role or seniority).
pub fn validate_analysis(raw: &Value) -> Result<ResumeAnalysis, LlmError> {
    let object = raw
        .as_object()
        .ok_or_else(|| LlmError::Schema("expected a JSON object".to_string()))?;

    let technical_skills = string_set(object.get("technical_skills"), "technical_skills")?;
    let soft_skills = string_set(object.get("soft_skills"), "soft_skills")?;
    let role = label(object.get("role"), "role", PLACEHOLDER_ROLE)?;
    let seniority = label(object.get("seniority"), "seniority", PLACEHOLDER_SENIORITY)?;

    Ok(ResumeAnalysis {
        technical_skills,
        soft_skills,
        role,
        seniority,
    })
}

fn string_set(value: Option<&Value>, key: &str) -> Result<BTreeSet<String>, LlmError> {
    let items = value
        .ok_or_else(|| LlmError::Schema(format!("missing key '{key}'")))?
        .as_array()
        .ok_or_else(|| LlmError::Schema(format!("'{key}' must be an array")))?;

    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(|s| s.trim().to_string())
                .ok_or_else(|| LlmError::Schema(format!("'{key}' must contain only strings")))
        })
        .filter(|item| !matches!(item, Ok(s) if s.is_empty()))
        .collect()
}

fn label(value: Option<&Value>, key: &str, placeholder: &str) -> Result<String, LlmError> {
    let text = value
        .ok_or_else(|| LlmError::Schema(format!("missing key '{key}'")))?
        .as_str()
        .ok_or_else(|| LlmError::Schema(format!("'{key}' must be a string")))?
        .trim();
    Ok(if text.is_empty() {
        placeholder.to_string()
    } else {
        text.to_string()
    })
}

/// Cuts at a char boundary.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::llm_client::testing::{live_gate, FailingGenerator, ScriptedGenerator};

    const RESUME: &str = "Senior engineer. Experienced with Python, React and AWS. Strong leadership.";

    fn taxonomy() -> SkillTaxonomy {
        SkillTaxonomy::default()
    }

    #[tokio::test]
    async fn test_unconfigured_gate_equals_taxonomy() {
        let taxonomy = taxonomy();
        let outcome = analyze_resume(RESUME, &AvailabilityGate::Unconfigured, &taxonomy).await;
        assert_eq!(outcome.analysis, taxonomy.analyze(RESUME));
        assert_eq!(outcome.source, AnalysisSource::Taxonomy);
        assert!(matches!(
            outcome.fallback_reason,
            Some(FallbackReason::GateClosed(_))
        ));
        assert!(outcome.warning().is_some());
    }

    #[tokio::test]
    async fn test_failed_gate_equals_taxonomy() {
        let taxonomy = taxonomy();
        let gate = AvailabilityGate::Failed("tls".to_string());
        let outcome = analyze_resume(RESUME, &gate, &taxonomy).await;
        assert_eq!(outcome.analysis, taxonomy.analyze(RESUME));
        assert!(outcome.warning().unwrap().contains("tls"));
    }

    #[tokio::test]
    async fn test_valid_llm_output_is_done_with_llm() {
        let reply = json!({
            "technical_skills": ["Rust", "Kubernetes", " "],
            "soft_skills": ["Mentoring"],
            "role": "Backend Engineer",
            "seniority": "Senior"
        })
        .to_string();
        let gate = live_gate(ScriptedGenerator::new(format!("```json\n{reply}\n```")));
        let outcome = analyze_resume(RESUME, &gate, &taxonomy()).await;

        assert_eq!(outcome.source, AnalysisSource::Llm);
        assert!(outcome.fallback_reason.is_none());
        assert!(outcome.warning().is_none());
        let expected: BTreeSet<String> =
            ["Kubernetes", "Rust"].iter().map(|s| s.to_string()).collect();
        assert_eq!(outcome.analysis.technical_skills, expected);
        assert_eq!(outcome.analysis.role, "Backend Engineer");
        assert_eq!(outcome.analysis.seniority, "Senior");
    }

    #[tokio::test]
    async fn test_prompt_contains_resume_text() {
        let generator = ScriptedGenerator::new("not json");
        let gate = live_gate(generator.clone());
        analyze_resume(RESUME, &gate, &taxonomy()).await;
        let seen = generator.seen.lock().unwrap();
        assert_eq!(seen.len(), 1, "exactly one attempt, no retries");
        assert!(seen[0][0].content.contains("Experienced with Python"));
    }

    #[tokio::test]
    async fn test_backend_failure_falls_back() {
        let taxonomy = taxonomy();
        let gate = live_gate(Arc::new(FailingGenerator));
        let outcome = analyze_resume(RESUME, &gate, &taxonomy).await;
        assert_eq!(outcome.analysis, taxonomy.analyze(RESUME));
        assert!(matches!(
            outcome.fallback_reason,
            Some(FallbackReason::Backend(_))
        ));
    }

    #[tokio::test]
    async fn test_malformed_output_falls_back() {
        let taxonomy = taxonomy();
        let gate = live_gate(ScriptedGenerator::new("Here is the analysis: Python, React"));
        let outcome = analyze_resume(RESUME, &gate, &taxonomy).await;
        assert_eq!(outcome.source, AnalysisSource::Taxonomy);
        assert!(matches!(
            outcome.fallback_reason,
            Some(FallbackReason::InvalidOutput(_))
        ));
    }

    #[tokio::test]
    async fn test_schema_violation_falls_back() {
        let taxonomy = taxonomy();
        let reply = json!({"technical_skills": "Python", "soft_skills": [], "role": "x", "seniority": "y"});
        let gate = live_gate(ScriptedGenerator::new(reply.to_string()));
        let outcome = analyze_resume(RESUME, &gate, &taxonomy).await;
        assert_eq!(outcome.analysis, taxonomy.analyze(RESUME));
    }

    #[tokio::test]
    async fn test_empty_text_skips_llm() {
        let generator = ScriptedGenerator::new("{}");
        let gate = live_gate(generator.clone());
        let outcome = analyze_resume("   ", &gate, &taxonomy()).await;
        assert_eq!(outcome.fallback_reason, Some(FallbackReason::NoText));
        assert!(generator.seen.lock().unwrap().is_empty());
        assert!(outcome.analysis.technical_skills.is_empty());
    }

    #[test]
    fn test_validate_missing_key() {
        let raw = json!({"technical_skills": [], "soft_skills": [], "role": "Engineer"});
        let err = validate_analysis(&raw).unwrap_err();
        assert!(err.to_string().contains("seniority"));
    }

    #[test]
    fn test_validate_non_string_items() {
        let raw = json!({"technical_skills": [1, 2], "soft_skills": [], "role": "a", "seniority": "b"});
        assert!(validate_analysis(&raw).is_err());
    }

    #[test]
    fn test_validate_not_object() {
        assert!(validate_analysis(&json!(["Python"])).is_err());
    }

    #[test]
    fn test_validate_repairs_blank_labels_and_duplicates() {
        let raw = json!({
            "technical_skills": ["Go", "Go", " Go "],
            "soft_skills": [],
            "role": "  ",
            "seniority": ""
        });
        let analysis = validate_analysis(&raw).unwrap();
        assert_eq!(analysis.technical_skills.len(), 1);
        assert_eq!(analysis.role, PLACEHOLDER_ROLE);
        assert_eq!(analysis.seniority, PLACEHOLDER_SENIORITY);
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
