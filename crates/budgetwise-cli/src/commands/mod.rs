//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `budgets` - Budget commands (budgets, advise, apply)
//! - `donation` - Donation commands (suggest, record)
//! - `export` - Session state export
//! - `forecast` - Spending forecast
//! - `session` - Session loading and shared utilities (open_session, classifier setup)
//! - `transactions` - Transaction commands (categorize, confirm, classify)

pub mod budgets;
pub mod donation;
pub mod export;
pub mod forecast;
pub mod session;
pub mod transactions;

// Re-export command functions for main.rs
pub use budgets::*;
pub use donation::*;
pub use export::*;
pub use forecast::*;
pub use session::*;
pub use transactions::*;
