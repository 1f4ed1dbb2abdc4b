//! Skill relations: skills adjacent to a given skill.
//!
//! LLM-backed when the gate is live; otherwise (or on any LLM failure) a static
//! lookup table keyed by the lower-cased skill name, with a default list for
//! skills the table does not know.

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::llm_client::{complete_json, AvailabilityGate, LlmError};
use crate::skills::prompts::RELATED_SKILLS_PROMPT;

const RELATED_SKILLS_SYSTEM: &str = crate::llm_client::prompts::JSON_ONLY_SYSTEM;
const MAX_RELATED: usize = 10;

const DEFAULT_RELATED: &[&str] = &[
    "Git",
    "Problem Solving",
    "Communication",
    "Cloud Computing",
    "Agile",
];

const RELATED_TABLE: &[(&str, &[&str])] = &[
    ("python", &["Django", "Flask", "Pandas", "NumPy", "Data Science"]),
    ("javascript", &["TypeScript", "React", "Node.js", "HTML", "CSS"]),
    ("react", &["Redux", "Next.js", "TypeScript", "JavaScript", "Tailwind CSS"]),
    ("java", &["Spring Boot", "Hibernate", "Maven", "Microservices", "Kotlin"]),
    ("aws", &["Docker", "Kubernetes", "Terraform", "Lambda", "DevOps"]),
    ("docker", &["Kubernetes", "CI/CD", "Linux", "Helm", "DevOps"]),
    ("sql", &["PostgreSQL", "MySQL", "Data Modeling", "ETL", "Data Analysis"]),
    (
        "machine learning",
        &["Deep Learning", "TensorFlow", "PyTorch", "Scikit-learn", "Statistics"],
    ),
    ("node.js", &["Express", "JavaScript", "TypeScript", "MongoDB", "REST APIs"]),
    ("rust", &["Tokio", "WebAssembly", "Systems Programming", "C++", "Concurrency"]),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelatedSkills {
    pub skill: String,
    pub related_skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Related skills for `skill`. Never fails: LLM problems degrade to the table.
pub async fn related_skills(skill: &str, gate: &AvailabilityGate) -> RelatedSkills {
    let reason = match gate.generator() {
        Some(generator) => {
            let prompt = RELATED_SKILLS_PROMPT.replace("{skill}", skill);
            let result = complete_json::<Value>(generator, &prompt, RELATED_SKILLS_SYSTEM)
                .await
                .and_then(|raw| parse_related(&raw));
            match result {
                Ok(related_skills) => {
                    return RelatedSkills {
                        skill: skill.to_string(),
                        related_skills,
                        warning: None,
                    }
                }
                Err(e) => format!("LLM request failed: {e}"),
            }
        }
        None => gate.unavailable_reason().unwrap_or_default(),
    };

    warn!("Related skills for '{skill}' served from static table: {reason}");
    RelatedSkills {
        skill: skill.to_string(),
        related_skills: fallback_related(skill),
        warning: Some(format!("Static skill relations used: {reason}")),
    }
}

/// Table lookup keyed by the trimmed, lower-cased skill name.
pub fn fallback_related(skill: &str) -> Vec<String> {
    let key = skill.trim().to_lowercase();
    RELATED_TABLE
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, related)| *related)
        .unwrap_or(DEFAULT_RELATED)
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Accepts `["a", "b"]` or `{"related_skills": ["a", "b"]}`; must yield at least one name.
fn parse_related(raw: &Value) -> Result<Vec<String>, LlmError> {
    let items = match raw {
        Value::Array(items) => items,
        Value::Object(map) => map
            .get("related_skills")
            .and_then(Value::as_array)
            .ok_or_else(|| LlmError::Schema("missing 'related_skills' array".to_string()))?,
        _ => return Err(LlmError::Schema("expected a JSON array".to_string())),
    };

    let mut related: Vec<String> = Vec::new();
    for item in items {
        let name = item
            .as_str()
            .ok_or_else(|| LlmError::Schema("related skills must be strings".to_string()))?
            .trim();
        if !name.is_empty() && !related.iter().any(|r| r.eq_ignore_ascii_case(name)) {
            related.push(name.to_string());
        }
    }
    related.truncate(MAX_RELATED);

    if related.is_empty() {
        return Err(LlmError::Schema("no related skills returned".to_string()));
    }
    Ok(related)
}
