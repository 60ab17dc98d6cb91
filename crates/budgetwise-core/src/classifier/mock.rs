//! Keyword-rule classifier
//!
//! Deterministic stand-in for a language model. Useful for unit tests and for
//! running the CLI without an Ollama server.

use async_trait::async_trait;
use regex::Regex;

use crate::error::Result;

use super::{Classification, TextClassifier};

/// Score given to the label whose rule matched; the rest is shared evenly
const MATCH_SCORE: f64 = 0.9;
/// Score given to "Other" when nothing matched (below the confidence threshold)
const FALLBACK_SCORE: f64 = 0.4;

const DEFAULT_RULES: &[(&str, &str)] = &[
    (
        "Subscriptions",
        r"(?i)\b(netflix|spotify|hulu|disney\+?|subscription|membership|patreon|icloud)\b",
    ),
    (
        "Utilities",
        r"(?i)\b(electric(ity)?|water bill|gas bill|internet|utility|utilities|phone bill|power)\b",
    ),
    (
        "Healthcare",
        r"(?i)\b(pharmacy|doctor|dentist|hospital|clinic|medicine|prescription|cvs|walgreens)\b",
    ),
    (
        "Transportation",
        r"(?i)\b(uber|lyft|taxi|fuel|gas|petrol|bus|train|metro|parking|shell|chevron)\b",
    ),
    (
        "Food",
        r"(?i)\b(grocer(y|ies)|restaurant|cafe|coffee|starbucks|pizza|lunch|dinner|breakfast|burger|food|bakery)\b",
    ),
    (
        "Entertainment",
        r"(?i)\b(movie|cinema|concert|theat(er|re)|game|games|bowling|museum|tickets?)\b",
    ),
    (
        "Shopping",
        r"(?i)\b(amazon|walmart|target|mall|clothing|shoes|store|ikea|costco)\b",
    ),
];

/// Keyword-rule classifier
///
/// Rules are checked in order and the first match wins.
#[derive(Clone)]
pub struct MockClassifier {
    rules: Vec<(String, Regex)>,
    /// Whether health_check should return true
    pub healthy: bool,
}

impl MockClassifier {
    /// Create a classifier with the built-in keyword rules (healthy by default)
    pub fn new() -> Self {
        let rules = DEFAULT_RULES
            .iter()
            .filter_map(|(label, pattern)| {
                Regex::new(pattern).ok().map(|re| (label.to_string(), re))
            })
            .collect();
        Self {
            rules,
            healthy: true,
        }
    }

    /// Create an unhealthy classifier
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::new()
        }
    }

    fn matched_label(&self, text: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|(_, re)| re.is_match(text))
            .map(|(label, _)| label.as_str())
    }
}

impl Default for MockClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextClassifier for MockClassifier {
    async fn classify(&self, text: &str, labels: &[&str]) -> Result<Classification> {
        let winner = self
            .matched_label(text)
            .filter(|label| labels.contains(label))
            .or_else(|| labels.iter().copied().find(|l| *l == "Other"));

        let top_score = match winner {
            Some("Other") | None => FALLBACK_SCORE,
            Some(_) => MATCH_SCORE,
        };
        let others = labels.len().saturating_sub(usize::from(winner.is_some())).max(1);
        let rest = if winner.is_some() {
            (1.0 - top_score) / others as f64
        } else {
            1.0 / labels.len().max(1) as f64
        };

        let scored = labels
            .iter()
            .map(|label| {
                let score = if Some(*label) == winner { top_score } else { rest };
                (label.to_string(), score)
            })
            .collect();

        Ok(Classification::from_scores(scored))
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }
}
