//! Test utilities for budgetwise-core
//!
//! This module provides a mock Ollama server for development and for testing
//! the HTTP classifier end to end.

use axum::{
    extract::{Json, State},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;

/// Mock Ollama server for testing and development
pub struct MockOllamaServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

#[derive(Clone, Default)]
struct MockState {
    /// Fixed `response` text; when unset the prompt is scored by keywords
    canned: Option<Arc<String>>,
}

impl MockOllamaServer {
    /// Start a server that scores classification prompts by keyword
    pub async fn start() -> Self {
        Self::serve(MockState::default()).await
    }

    /// Start a server that answers every generate call with `response`
    pub async fn with_response(response: &str) -> Self {
        Self::serve(MockState {
            canned: Some(Arc::new(response.to_string())),
        })
        .await
    }

    async fn serve(state: MockState) -> Self {
        let app = Router::new()
            .route("/api/tags", get(handle_tags))
            .route("/api/generate", post(handle_generate))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockOllamaServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Ollama tags endpoint response (health check)
async fn handle_tags() -> Json<TagsResponse> {
    Json(TagsResponse {
        models: vec![ModelInfo {
            name: "llama3.2:latest".to_string(),
            modified_at: "2024-01-01T00:00:00Z".to_string(),
            size: 4_000_000_000,
        }],
    })
}

/// Ollama generate endpoint
async fn handle_generate(
    State(state): State<MockState>,
    Json(request): Json<GenerateRequest>,
) -> Json<GenerateResponse> {
    let response = match state.canned {
        Some(canned) => canned.as_ref().clone(),
        None => score_prompt(&request.prompt),
    };

    Json(GenerateResponse {
        model: request.model,
        response,
        done: true,
    })
}

/// Score the prompt's categories: a keyword hit gets most of the mass
fn score_prompt(prompt: &str) -> String {
    let labels = extract_categories(prompt);
    let text = extract_transaction(prompt).to_uppercase();

    let hit = if text.contains("NETFLIX") || text.contains("SPOTIFY") {
        "Subscriptions"
    } else if text.contains("UBER") || text.contains("LYFT") || text.contains("TAXI") {
        "Transportation"
    } else if text.contains("GROCER") || text.contains("RESTAURANT") || text.contains("PIZZA") {
        "Food"
    } else if text.contains("AMAZON") || text.contains("SHOES") {
        "Shopping"
    } else if text.contains("CINEMA") || text.contains("CONCERT") {
        "Entertainment"
    } else if text.contains("PHARMACY") || text.contains("DOCTOR") {
        "Healthcare"
    } else if text.contains("ELECTRIC") || text.contains("INTERNET") {
        "Utilities"
    } else {
        ""
    };

    let scores: BTreeMap<&str, f64> = labels
        .iter()
        .map(|label| {
            let score = if *label == hit {
                0.85
            } else if hit.is_empty() {
                0.2
            } else {
                0.02
            };
            (*label, score)
        })
        .collect();

    format!(
        "Sure! Here are the scores:\n{}",
        serde_json::to_string(&scores).unwrap()
    )
}

/// Categories listed on the prompt's "Categories:" line
fn extract_categories(prompt: &str) -> Vec<&str> {
    prompt
        .lines()
        .find_map(|line| line.strip_prefix("Categories: "))
        .map(|list| list.split(", ").map(str::trim).collect())
        .unwrap_or_default()
}

/// Text on the prompt's `Transaction: "..."` line
fn extract_transaction(prompt: &str) -> &str {
    prompt
        .lines()
        .find_map(|line| line.strip_prefix("Transaction: "))
        .map(|t| t.trim_matches('"'))
        .unwrap_or(prompt)
}

// Request/Response types for the mock server

#[derive(Debug, Serialize)]
struct TagsResponse {
    models: Vec<ModelInfo>,
}

#[derive(Debug, Serialize)]
struct ModelInfo {
    name: String,
    modified_at: String,
    size: u64,
}

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    #[allow(dead_code)]
    stream: bool,
}

#[derive(Debug, Serialize)]
struct GenerateResponse {
    model: String,
    response: String,
    done: bool,
}
