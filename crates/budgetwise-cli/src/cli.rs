//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use budgetwise_core::{AdjustmentAction, Category};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Budgetwise - Adaptive budgets that learn from your spending
#[derive(Parser)]
#[command(name = "budgetwise")]
#[command(about = "Budget recommendations, forecasts and donation suggestions", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Budget config file (defaults to the user config, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Transaction history CSV (date,description,amount[,category]) to load first
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show limits, spending and remaining budget per category
    Budgets,

    /// Classify an expense and record it if the classifier is confident
    Categorize {
        /// What the expense was for
        #[arg(short, long)]
        description: String,

        /// Amount spent
        #[arg(short, long)]
        amount: f64,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Record an expense under a category you choose
    Confirm {
        /// What the expense was for
        #[arg(short, long)]
        description: String,

        /// Amount spent
        #[arg(short, long)]
        amount: f64,

        /// Category (Food, Transportation, Entertainment, Utilities, Shopping,
        /// Subscriptions, Healthcare, Other)
        #[arg(short, long)]
        category: Category,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Suggest a budget adjustment for the most urgent category
    Advise,

    /// Apply a budget adjustment and learn from it
    Apply {
        /// Category to adjust
        #[arg(short, long)]
        category: Category,

        /// Adjustment: decrease, maintain, increase
        #[arg(short, long)]
        action: AdjustmentAction,
    },

    /// Forecast spending for the next few days
    Forecast,

    /// Donation suggestions and recording
    Donation {
        #[command(subcommand)]
        action: DonationAction,
    },

    /// Export session state as JSON
    Export {
        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show classifier scores for a description without recording anything
    Classify {
        /// Text to classify
        #[arg(short, long)]
        text: String,
    },
}

#[derive(Subcommand)]
pub enum DonationAction {
    /// Suggest a donation amount from your spending patterns
    Suggest,

    /// Record a donation
    Record {
        /// Amount donated
        #[arg(short, long)]
        amount: f64,

        /// Charity category (Education, Health, Environment, Poverty Alleviation,
        /// Animal Welfare)
        #[arg(short, long)]
        charity: String,

        /// Budget category that funds the donation
        #[arg(long)]
        from: Option<String>,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}
