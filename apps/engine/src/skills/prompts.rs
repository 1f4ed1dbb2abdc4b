// Skill Intelligence LLM prompt templates.
// All prompts for the skills module are defined here.

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

pub const RESUME_ANALYSIS_SYSTEM: &str = JSON_ONLY_SYSTEM;

pub const RESUME_ANALYSIS_PROMPT: &str = r#"Analyze the following resume and extract structured career signals.

RESUME TEXT:
{resume_text}

OUTPUT SCHEMA (return exactly this structure, with exactly these four keys):
{
  "technical_skills": ["string"],
  "soft_skills": ["string"],
  "role": "string",
  "seniority": "Intern" | "Junior" | "Mid-level" | "Senior" | "Lead" | "Principal"
}

RULES:
1. Only list skills the resume actually mentions. Do NOT infer or invent skills.
2. "role" is the candidate's most recent or best-fitting job title.
3. Return ONLY the JSON object. Nothing else, no code fences."#;

pub const TREND_PREDICTION_PROMPT: &str = r#"Assess the job-market demand trend for the skill "{skill}" over the next 2-3 years.

OUTPUT SCHEMA (return exactly this structure):
{
  "trend": "Growing" | "Stable" | "Declining",
  "score": number between 0 and 100 (current demand strength),
  "reason": "one or two sentences explaining the assessment"
}

Return ONLY the JSON object. Nothing else, no code fences."#;

pub const RELATED_SKILLS_PROMPT: &str = r#"List 5 skills that are most closely related to "{skill}" and that someone who knows it would be expected to learn next or already use alongside it.

Return ONLY a JSON array of 5 short skill names, for example: ["Skill A", "Skill B", "Skill C", "Skill D", "Skill E"]. No code fences."#;
