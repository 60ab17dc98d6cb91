//! Error types for Budgetwise

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Computation failed ({transaction_count} transactions): {message}")]
    Computation {
        message: String,
        transaction_count: usize,
    },

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Classifier error: {0}")]
    Classifier(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl Error {
    /// True for failures caused by the caller's input (bad category, bad
    /// amount, insufficient reallocation budget). These never have side effects.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::NotFound(_))
    }

    pub(crate) fn computation(message: impl Into<String>, transaction_count: usize) -> Self {
        Error::Computation {
            message: message.into(),
            transaction_count,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
