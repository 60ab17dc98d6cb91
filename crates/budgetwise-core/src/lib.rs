//! Budgetwise Core Library
//!
//! Adaptive budget recommendation engine for a personal finance assistant:
//! - Budget ledger with per-category limits and transaction history
//! - Utilization analysis and a learning budget-adjustment policy
//! - Short-horizon daily spending forecasts
//! - Donation sizing from transaction-size clusters
//! - Pluggable transaction classifier (Ollama or keyword rules)
//! - CSV import and TOML configuration

pub mod advisor;
pub mod classifier;
pub mod config;
pub mod error;
pub mod import;
pub mod ledger;
pub mod models;
pub mod session;

/// Test utilities including mock Ollama server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use advisor::{
    AdjustmentOutcome, AppliedAdjustment, BudgetSuggestion, CategoryUtilization, DonationOutcome,
    DonationSizer, DonationSuggestion, Forecast, ForecastMethod, ForecastOutcome, ForecastPoint,
    Forecaster, LinearAutoregressor, PolicyEngine, SequenceModel, SpendingTiers,
    UtilizationAnalyzer, UtilizationStatus, ValueTable,
};
pub use classifier::{
    Classification, ClassifierClient, MockClassifier, OllamaClassifier, TextClassifier,
};
pub use config::BudgetConfig;
pub use error::{Error, Result};
pub use import::{parse_csv, parse_csv_file, ImportedTransaction};
pub use ledger::Ledger;
pub use models::{
    AdjustmentAction, AdjustmentReason, BudgetLine, Category, DonationRequest, Feedback,
    NewTransaction, Transaction, TransactionCategory,
};
pub use session::{
    CategorizeOutcome, ImportSummary, Session, SessionSnapshot, SharedSession,
    UncertainTransaction, ValueRow,
};
