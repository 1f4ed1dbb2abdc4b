//! Skill Taxonomy Matcher: deterministic, rule-based fallback tier.
//!
//! Pure-Rust, no external dependency, no failure mode. Built once at startup
//! and shared read-only across requests behind an `Arc`.
//!
//! Algorithm:
//! 1. Tokenize the text into words, keeping `+ # .` inside a word (`c++`, `node.js`).
//! 2. For every run of 1..=max_phrase_len tokens, look the lower-cased phrase up
//!    in the technical taxonomy and the soft-skill vocabulary.
//! 3. On a hit, insert the entry's canonical display form (set semantics).

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use anyhow::{Context, Result};

use crate::skills::{ResumeAnalysis, PLACEHOLDER_ROLE, PLACEHOLDER_SENIORITY};

/// Labels the rule-based tier always knows about.
const BUILTIN_TECHNICAL: &[&str] = &[
    // core set
    "python",
    "react",
    "javascript",
    "node.js",
    "sql",
    "aws",
    "docker",
    "java",
    "c++",
    "machine learning",
    // languages
    "typescript",
    "golang",
    "rust",
    "ruby",
    "php",
    "swiftui",
    "kotlin",
    "scala",
    "c#",
    "html",
    "css",
    "bash",
    "graphql",
    // frameworks & libraries
    "angular",
    "vue",
    "django",
    "flask",
    "fastapi",
    "express.js",
    "spring boot",
    "ruby on rails",
    "pandas",
    "numpy",
    "tensorflow",
    "pytorch",
    "scikit-learn",
    // data & infra
    "postgresql",
    "mysql",
    "mongodb",
    "redis",
    "kafka",
    "apache spark",
    "kubernetes",
    "terraform",
    "azure",
    "gcp",
    "linux",
    "git",
    "deep learning",
    "data science",
    "data analysis",
    "computer vision",
    "natural language processing",
    "devops",
    "microservices",
];

const SOFT_SKILLS: &[&str] = &[
    "communication",
    "leadership",
    "teamwork",
    "collaboration",
    "problem solving",
    "critical thinking",
    "adaptability",
    "creativity",
    "mentoring",
    "time management",
    "project management",
    "negotiation",
    "presentation skills",
    "public speaking",
    "empathy",
    "attention to detail",
];

/// Case-insensitive lookup from a lower-cased phrase to its canonical display form.
#[derive(Debug, Clone, Default)]
struct Vocabulary {
    entries: HashMap<String, String>,
    max_phrase_len: usize,
}

impl Vocabulary {
    fn insert(&mut self, label: &str) {
        let key = normalize_phrase(label);
        if key.is_empty() {
            return;
        }
        self.max_phrase_len = self.max_phrase_len.max(key.split(' ').count());
        self.entries
            .entry(key.clone())
            .or_insert_with(|| canonical_display(&key));
    }

    fn matches(&self, tokens: &[String]) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        for start in 0..tokens.len() {
            let longest = self.max_phrase_len.min(tokens.len() - start);
            for len in 1..=longest {
                let phrase = tokens[start..start + len].join(" ");
                if let Some(display) = self.entries.get(&phrase) {
                    found.insert(display.clone());
                }
            }
        }
        found
    }
}

/// Immutable process-wide skill taxonomy.
#[derive(Debug, Clone)]
pub struct SkillTaxonomy {
    technical: Vocabulary,
    soft: Vocabulary,
}

impl Default for SkillTaxonomy {
    fn default() -> Self {
        Self::with_extra_labels(std::iter::empty::<&str>())
    }
}

impl SkillTaxonomy {
    /// The built-in taxonomy plus any additional technical labels.
    pub fn with_extra_labels<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut technical = Vocabulary::default();
        for label in BUILTIN_TECHNICAL {
            technical.insert(label);
        }
        for label in extra {
            technical.insert(label.as_ref());
        }

        let mut soft = Vocabulary::default();
        for label in SOFT_SKILLS {
            soft.insert(label);
        }

        Self { technical, soft }
    }

    /// Loads the built-in taxonomy extended with a newline-separated label file.
    /// Blank lines and lines starting with `#` are ignored.
    pub fn load(extra_path: Option<&Path>) -> Result<Self> {
        let Some(path) = extra_path else {
            return Ok(Self::default());
        };
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read skill taxonomy file {}", path.display()))?;
        let labels = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'));
        Ok(Self::with_extra_labels(labels))
    }

    /// Number of technical labels.
    pub fn len(&self) -> usize {
        self.technical.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.technical.entries.is_empty()
    }

    /// Matches technical skills and soft skills. Never fails; role and
    /// seniority are fixed placeholders since keyword matching cannot infer them.
    pub fn analyze(&self, text: &str) -> ResumeAnalysis {
        let tokens = tokenize(text);
        ResumeAnalysis {
            technical_skills: self.technical.matches(&tokens),
            soft_skills: self.soft.matches(&tokens),
            role: PLACEHOLDER_ROLE.to_string(),
            seniority: PLACEHOLDER_SENIORITY.to_string(),
        }
    }
}

/// Splits text into lower-cased word tokens. `+`, `#` and `.` survive inside a
/// token; leading/trailing dots are trimmed so sentence punctuation never sticks.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#' | '.')))
        .map(|raw| raw.trim_matches('.'))
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Lower-cases a label and tokenizes it the same way as input text, so
/// `problem-solving` and `Problem Solving` share one key.
fn normalize_phrase(label: &str) -> String {
    tokenize(label).join(" ")
}

/// First character upper-cased, the rest lower-cased: `aws` → `Aws`, `node.js` → `Node.js`.
pub fn canonical_display(key: &str) -> String {
    let lower = key.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
