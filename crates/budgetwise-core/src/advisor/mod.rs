//! Adaptive budget recommendation engine
//!
//! Reads the ledger and produces advice. Only [`PolicyEngine::apply`] writes
//! back (through the ledger) and every other component is a pure read.
//!
//! ## Components
//!
//! - **Utilization Analyzer** - classifies each category as overspent,
//!   nearing its limit, underutilized or healthy and picks the most urgent
//! - **Policy Engine** - turns the urgent category into a multiplier from the
//!   action space and learns a value table from applied adjustments
//! - **Forecaster** - predicts the next days' total spending
//! - **Donation Sizer** - clusters transaction sizes to size a donation
//!
//! ## Usage
//!
//! ```rust,ignore
//! use budgetwise_core::advisor::{Forecaster, PolicyEngine};
//!
//! let mut engine = PolicyEngine::new(&config.policy, &config.thresholds);
//! if let AdjustmentOutcome::AdjustmentNeeded(s) = engine.suggest(&ledger) {
//!     engine.apply(&mut ledger, s.category, s.action)?;
//! }
//! let forecast = Forecaster::new(&config.forecast).forecast(&ledger)?;
//! ```

pub mod donation;
pub mod forecaster;
pub mod kmeans;
pub mod policy;
pub mod sequence_model;
pub mod types;
pub mod utilization;

pub use donation::DonationSizer;
pub use forecaster::Forecaster;
pub use policy::{PolicyEngine, ValueTable};
pub use sequence_model::{LinearAutoregressor, SequenceModel, TrainingPair};
pub use types::{
    AdjustmentOutcome, AppliedAdjustment, BudgetSuggestion, CategoryUtilization,
    DonationOutcome, DonationSuggestion, Forecast, ForecastMethod, ForecastOutcome,
    ForecastPoint, SpendingTiers, UtilizationStatus,
};
pub use utilization::UtilizationAnalyzer;
