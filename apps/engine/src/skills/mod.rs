// Skill Intelligence: resume analysis, taxonomy matching, skill relations, trend prediction.
// All LLM calls go through llm_client, and only when the AvailabilityGate is live.

pub mod analyzer;
pub mod handlers;
pub mod prompts;
pub mod relations;
pub mod taxonomy;
pub mod trend;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub use taxonomy::SkillTaxonomy;

/// Role reported when no tier can infer one.
pub const PLACEHOLDER_ROLE: &str = "Professional";
/// Seniority reported when no tier can infer one.
pub const PLACEHOLDER_SENIORITY: &str = "Unknown";

/// Structured resume signals. Always fully populated, whichever tier produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    pub technical_skills: BTreeSet<String>,
    pub soft_skills: BTreeSet<String>,
    pub role: String,
    pub seniority: String,
}

/// Which tier produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisSource {
    Llm,
    Taxonomy,
}
