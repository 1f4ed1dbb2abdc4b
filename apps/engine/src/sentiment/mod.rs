//! Sentiment Scorer: lexicon-based polarity and subjectivity.
//!
//! Each lexicon word carries a (polarity, subjectivity) pair. A directly
//! preceding intensifier scales both; a negator up to three tokens earlier
//! flips and halves polarity. Scores are averaged over matched words.
//!
//! Thresholds: score > 0.1 → Positive, score < -0.1 → Negative, else Neutral.

pub mod handlers;

use serde::Serialize;
use thiserror::Error;

const POSITIVE_THRESHOLD: f64 = 0.1;
const NEGATIVE_THRESHOLD: f64 = -0.1;
const NEGATION_FACTOR: f64 = -0.5;
const NEGATION_WINDOW: usize = 3;

/// (word, polarity, subjectivity)
const LEXICON: &[(&str, f64, f64)] = &[
    ("love", 0.5, 0.6),
    ("loved", 0.7, 0.8),
    ("loving", 0.6, 0.9),
    ("great", 0.8, 0.75),
    ("good", 0.7, 0.6),
    ("excellent", 1.0, 1.0),
    ("amazing", 0.6, 0.9),
    ("awesome", 1.0, 1.0),
    ("wonderful", 1.0, 1.0),
    ("fantastic", 0.4, 0.9),
    ("best", 1.0, 0.3),
    ("better", 0.5, 0.5),
    ("happy", 0.8, 1.0),
    ("glad", 0.5, 1.0),
    ("nice", 0.6, 1.0),
    ("enjoy", 0.4, 0.5),
    ("enjoyed", 0.4, 0.5),
    ("exciting", 0.3, 0.8),
    ("excited", 0.4, 0.75),
    ("interesting", 0.5, 0.5),
    ("promising", 0.3, 0.6),
    ("positive", 0.23, 0.55),
    ("strong", 0.43, 0.73),
    ("easy", 0.43, 0.83),
    ("satisfied", 0.5, 1.0),
    ("rewarding", 0.5, 0.6),
    ("confident", 0.5, 0.8),
    ("hate", -0.8, 0.9),
    ("hated", -0.9, 0.7),
    ("bad", -0.7, 0.67),
    ("terrible", -1.0, 1.0),
    ("awful", -1.0, 1.0),
    ("horrible", -1.0, 1.0),
    ("worst", -1.0, 1.0),
    ("worse", -0.4, 0.6),
    ("poor", -0.4, 0.6),
    ("boring", -1.0, 1.0),
    ("sad", -0.5, 1.0),
    ("unhappy", -0.6, 0.9),
    ("angry", -0.5, 1.0),
    ("annoying", -0.8, 0.9),
    ("frustrating", -0.4, 0.7),
    ("frustrated", -0.7, 0.4),
    ("disappointing", -0.6, 0.7),
    ("disappointed", -0.75, 0.75),
    ("difficult", -0.5, 1.0),
    ("hard", -0.29, 0.54),
    ("stressful", -0.5, 0.8),
    ("useless", -0.5, 0.2),
    ("weak", -0.375, 0.625),
    ("negative", -0.3, 0.4),
    ("worried", -0.4, 0.7),
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("so", 1.3),
    ("super", 1.3),
    ("highly", 1.3),
    ("quite", 1.1),
    ("extremely", 1.5),
    ("incredibly", 1.5),
    ("absolutely", 1.5),
];

const NEGATORS: &[&str] = &["not", "no", "never", "cannot", "neither", "nor", "without"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SentimentError {
    #[error("Text must not be empty")]
    EmptyInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub fn from_score(score: f64) -> Self {
        if score > POSITIVE_THRESHOLD {
            SentimentLabel::Positive
        } else if score < NEGATIVE_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentResult {
    pub sentiment: SentimentLabel,
    /// Polarity in [-1, 1].
    pub score: f64,
    /// Subjectivity in [0, 1].
    pub subjectivity: f64,
}

/// Scores `text`. Fails only on empty (or whitespace-only) input.
pub fn analyze(text: &str) -> Result<SentimentResult, SentimentError> {
    if text.trim().is_empty() {
        return Err(SentimentError::EmptyInput);
    }

    let tokens = tokenize(text);
    let mut polarities = Vec::new();
    let mut subjectivities = Vec::new();
    let mut intensity: Option<f64> = None;
    let mut negated_within: Option<usize> = None;

    for token in &tokens {
        if is_negator(token) {
            negated_within = Some(NEGATION_WINDOW);
            intensity = None;
            continue;
        }
        if let Some(factor) = lookup_intensifier(token) {
            intensity = Some(intensity.unwrap_or(1.0) * factor);
            continue;
        }

        if let Some((polarity, subjectivity)) = lookup_word(token) {
            let factor = intensity.unwrap_or(1.0);
            let mut polarity = (polarity * factor).clamp(-1.0, 1.0);
            if negated_within.is_some() {
                polarity *= NEGATION_FACTOR;
            }
            polarities.push(polarity);
            subjectivities.push((subjectivity * factor).clamp(0.0, 1.0));
            negated_within = None;
        } else {
            negated_within = negated_within.and_then(|left| left.checked_sub(1)).filter(|&l| l > 0);
        }
        intensity = None;
    }

    let score = round3(mean(&polarities).clamp(-1.0, 1.0));
    let subjectivity = round3(mean(&subjectivities).clamp(0.0, 1.0));

    Ok(SentimentResult {
        sentiment: SentimentLabel::from_score(score),
        score,
        subjectivity,
    })
}

/// Apostrophes are kept inside words (`don't`) but trimmed from the edges,
/// so quoted words (`'great'`) still match the lexicon.
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '\u{2019}'))
        .map(|t| t.to_lowercase().replace('\u{2019}', "'"))
        .map(|t| t.trim_matches('\'').to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

fn is_negator(token: &str) -> bool {
    NEGATORS.contains(&token) || token.ends_with("n't")
}

fn lookup_intensifier(token: &str) -> Option<f64> {
    INTENSIFIERS
        .iter()
        .find(|(word, _)| *word == token)
        .map(|(_, factor)| *factor)
}

fn lookup_word(token: &str) -> Option<(f64, f64)> {
    LEXICON
        .iter()
        .find(|(word, _, _)| *word == token)
        .map(|(_, polarity, subjectivity)| (*polarity, *subjectivity))
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_love_is_positive() {
        let result = analyze("I love this").unwrap();
        assert_eq!(result.sentiment, SentimentLabel::Positive);
        assert!(result.score > 0.1);
    }

    #[test]
    fn test_hate_is_negative() {
        let result = analyze("I hate this").unwrap();
        assert_eq!(result.sentiment, SentimentLabel::Negative);
        assert!(result.score < -0.1);
    }

    #[test]
    fn test_empty_input_fails() {
        assert_eq!(analyze(""), Err(SentimentError::EmptyInput));
        assert_eq!(analyze("  \n\t"), Err(SentimentError::EmptyInput));
    }

    #[test]
    fn test_no_opinion_words_is_neutral() {
        let result = analyze("The meeting is on Tuesday at noon.").unwrap();
        assert_eq!(result.sentiment, SentimentLabel::Neutral);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.subjectivity, 0.0);
    }

    #[test]
    fn test_negation_flips_polarity() {
        let plain = analyze("This job is good").unwrap();
        let negated = analyze("This job is not good").unwrap();
        assert!(plain.score > 0.0);
        assert!(negated.score < 0.0);
        assert_eq!(negated.sentiment, SentimentLabel::Negative);
    }

    #[test]
    fn test_contraction_negation() {
        let result = analyze("I don't hate it").unwrap();
        assert!(result.score > 0.0);
    }

    #[test]
    fn test_negation_window_expires() {
        // "not" is more than three tokens away from "great".
        let result = analyze("not that I mind the very long commute great").unwrap();
        assert!(result.score > 0.0);
    }

    #[test]
    fn test_intensifier_strengthens() {
        let plain = analyze("a good team").unwrap();
        let boosted = analyze("a very good team").unwrap();
        assert!(boosted.score > plain.score);
        assert!(boosted.score <= 1.0);
        assert!(boosted.subjectivity <= 1.0);
    }

    #[test]
    fn test_scores_bounded() {
        let result = analyze("absolutely extremely incredibly excellent").unwrap();
        assert!(result.score <= 1.0 && result.score >= -1.0);
        assert!((0.0..=1.0).contains(&result.subjectivity));
    }

    #[test]
    fn test_mixed_text_averages() {
        let result = analyze("The pay is good but the hours are terrible").unwrap();
        // (0.7 + -1.0) / 2 = -0.15
        assert!((result.score - -0.15).abs() < 1e-9);
        assert_eq!(result.sentiment, SentimentLabel::Negative);
    }

    #[test]
    fn test_thresholds() {
        assert_eq!(SentimentLabel::from_score(0.1), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_score(-0.1), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_score(0.11), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_score(-0.11), SentimentLabel::Negative);
    }

    #[test]
    fn test_quoted_words_match_lexicon() {
        let result = analyze("Honestly the team was 'great'").unwrap();
        assert_eq!(result.sentiment, SentimentLabel::Positive);
        assert!((result.score - 0.8).abs() < 1e-9);

        let curly = analyze("The onboarding was \u{2018}awful\u{2019}").unwrap();
        assert_eq!(curly.sentiment, SentimentLabel::Negative);
    }

    #[test]
    fn test_curly_apostrophe() {
        let result = analyze("It isn\u{2019}t bad").unwrap();
        assert!(result.score > 0.0);
    }
}
