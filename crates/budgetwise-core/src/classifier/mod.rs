//! Zero-shot transaction classifier adapter
//!
//! The engine only needs one capability from a language model: given a
//! transaction description and the candidate category labels, return every
//! label with a score, best first.
//!
//! # Architecture
//!
//! - `TextClassifier` trait: the interface every backend implements
//! - `ClassifierClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backends: `OllamaClassifier` (HTTP) and `MockClassifier` (keyword rules)
//!
//! # Configuration
//!
//! Environment variables:
//! - `CLASSIFIER_BACKEND`: Backend to use (ollama, mock). Default: ollama
//! - `OLLAMA_HOST`: Ollama server URL (required for ollama backend)
//! - `OLLAMA_MODEL`: Model name (default: llama3.2)

mod mock;
mod ollama;
pub mod parsing;

pub use mock::MockClassifier;
pub use ollama::OllamaClassifier;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Labels with their scores, ordered by descending score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub labels: Vec<String>,
    pub scores: Vec<f64>,
}

impl Classification {
    /// Build from unordered (label, score) pairs
    ///
    /// Sorting is stable, so equal scores keep the order they were given in.
    pub fn from_scores(mut scored: Vec<(String, f64)>) -> Self {
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        let (labels, scores) = scored.into_iter().unzip();
        Self { labels, scores }
    }

    /// Best label and its score
    pub fn top(&self) -> Option<(&str, f64)> {
        self.labels
            .first()
            .zip(self.scores.first())
            .map(|(label, score)| (label.as_str(), *score))
    }
}

/// Trait implemented by every classifier backend
#[async_trait]
pub trait TextClassifier: Send + Sync {
    /// Score every candidate label for `text`
    async fn classify(&self, text: &str, labels: &[&str]) -> Result<Classification>;

    /// Check if the backend is available
    async fn health_check(&self) -> bool;

    /// Get the model name (for logging)
    fn model(&self) -> &str;
}

/// Concrete classifier client
#[derive(Clone)]
pub enum ClassifierClient {
    /// Ollama backend (HTTP API)
    Ollama(OllamaClassifier),
    /// Keyword rules, for tests and offline use
    Mock(MockClassifier),
}

impl ClassifierClient {
    /// Create a classifier from environment variables
    ///
    /// Returns None if the selected backend is missing required settings.
    pub fn from_env() -> Option<Self> {
        let backend =
            std::env::var("CLASSIFIER_BACKEND").unwrap_or_else(|_| "ollama".to_string());

        match backend.to_lowercase().as_str() {
            "ollama" => OllamaClassifier::from_env().map(ClassifierClient::Ollama),
            "mock" => Some(ClassifierClient::mock()),
            _ => {
                tracing::warn!(backend = %backend, "Unknown CLASSIFIER_BACKEND, falling back to ollama");
                OllamaClassifier::from_env().map(ClassifierClient::Ollama)
            }
        }
    }

    /// Create an Ollama classifier directly
    pub fn ollama(host: &str, model: &str) -> Self {
        ClassifierClient::Ollama(OllamaClassifier::new(host, model))
    }

    /// Create a keyword-rule classifier
    pub fn mock() -> Self {
        ClassifierClient::Mock(MockClassifier::new())
    }

    /// Backend host, if it has one
    pub fn host(&self) -> Option<&str> {
        match self {
            ClassifierClient::Ollama(c) => Some(c.host()),
            ClassifierClient::Mock(_) => None,
        }
    }
}

#[async_trait]
impl TextClassifier for ClassifierClient {
    async fn classify(&self, text: &str, labels: &[&str]) -> Result<Classification> {
        match self {
            ClassifierClient::Ollama(c) => c.classify(text, labels).await,
            ClassifierClient::Mock(c) => c.classify(text, labels).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            ClassifierClient::Ollama(c) => c.health_check().await,
            ClassifierClient::Mock(c) => c.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            ClassifierClient::Ollama(c) => c.model(),
            ClassifierClient::Mock(c) => c.model(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_scores_orders_descending() {
        let c = Classification::from_scores(vec![
            ("Food".into(), 0.2),
            ("Shopping".into(), 0.7),
            ("Other".into(), 0.1),
        ]);
        assert_eq!(c.labels, vec!["Shopping", "Food", "Other"]);
        assert_eq!(c.top(), Some(("Shopping", 0.7)));
    }

    #[test]
    fn test_ties_keep_given_order() {
        let c = Classification::from_scores(vec![("Food".into(), 0.5), ("Other".into(), 0.5)]);
        assert_eq!(c.top(), Some(("Food", 0.5)));
    }

    #[test]
    fn test_empty_has_no_top() {
        assert_eq!(Classification::from_scores(Vec::new()).top(), None);
    }

    #[tokio::test]
    async fn test_client_dispatches_to_mock() {
        let client = ClassifierClient::mock();
        assert!(client.health_check().await);
        assert_eq!(client.model(), "mock");
        assert!(client.host().is_none());

        let c = client
            .classify("Netflix monthly", &["Food", "Subscriptions", "Other"])
            .await
            .unwrap();
        assert_eq!(c.top().map(|(l, _)| l), Some("Subscriptions"));
    }
}
