//! Ollama classifier backend
//!
//! Asks the model for a JSON object scoring every candidate label, then
//! normalizes the scores.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

use super::parsing::parse_label_scores;
use super::{Classification, TextClassifier};

#[derive(Clone)]
pub struct OllamaClassifier {
    http_client: Client,
    base_url: String,
    model: String,
}

impl OllamaClassifier {
    /// Create a new Ollama classifier
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    /// Create a new instance with a different model
    pub fn with_model(&self, model: &str) -> Self {
        Self {
            http_client: self.http_client.clone(),
            base_url: self.base_url.clone(),
            model: model.to_string(),
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("OLLAMA_HOST").ok()?;
        let model = std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3.2".to_string());
        Some(Self::new(&host, &model))
    }

    pub fn host(&self) -> &str {
        &self.base_url
    }
}

/// Request to Ollama API
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
}

/// Response from Ollama API
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

fn build_prompt(text: &str, labels: &[&str]) -> String {
    format!(
        "Classify this personal finance transaction into spending categories.\n\
         Categories: {}\n\
         Transaction: \"{}\"\n\n\
         Respond with only a JSON object mapping every category to a score between 0 and 1, \
         for example {{\"{}\": 0.8, ...}}.",
        labels.join(", "),
        text.replace('"', "'"),
        labels.first().copied().unwrap_or("Other")
    )
}

#[async_trait]
impl TextClassifier for OllamaClassifier {
    async fn classify(&self, text: &str, labels: &[&str]) -> Result<Classification> {
        let request = OllamaRequest {
            model: self.model.clone(),
            prompt: build_prompt(text, labels),
            stream: false,
        };

        let response = self
            .http_client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let ollama_response: OllamaResponse = response.json().await?;
        debug!("Ollama classifier response: {}", ollama_response.response);

        parse_label_scores(&ollama_response.response, labels)
    }

    async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }
}
