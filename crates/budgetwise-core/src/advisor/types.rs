//! Result types produced by the advisor components

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{AdjustmentAction, AdjustmentReason, Category};

/// Utilization class of a single category (exactly one applies)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UtilizationStatus {
    /// Remaining budget is negative
    Overspent,
    /// Not overspent, spending ratio above the nearing-limit threshold
    NearingLimit,
    /// Not overspent, spending ratio below the underutilized threshold
    Underutilized,
    /// None of the above
    Healthy,
}

impl UtilizationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UtilizationStatus::Overspent => "overspent",
            UtilizationStatus::NearingLimit => "nearing_limit",
            UtilizationStatus::Underutilized => "underutilized",
            UtilizationStatus::Healthy => "healthy",
        }
    }

    /// The adjustment reason this status maps to, if any
    pub fn reason(&self) -> Option<AdjustmentReason> {
        match self {
            UtilizationStatus::Overspent => Some(AdjustmentReason::Overspent),
            UtilizationStatus::NearingLimit => Some(AdjustmentReason::NearingLimit),
            UtilizationStatus::Underutilized => Some(AdjustmentReason::Underutilized),
            UtilizationStatus::Healthy => None,
        }
    }
}

impl fmt::Display for UtilizationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Spend analysis for one category at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryUtilization {
    pub category: Category,
    /// Current limit of the category
    pub current_budget: f64,
    pub spent: f64,
    pub remaining: f64,
    /// spent / current_budget
    pub spending_ratio: f64,
    pub overspent: bool,
    pub underutilized: bool,
    pub status: UtilizationStatus,
}

/// A recommended budget change for the most urgent category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSuggestion {
    pub category: Category,
    pub current_budget: f64,
    pub spent: f64,
    pub remaining: f64,
    pub spending_ratio: f64,
    /// Continuous multiplier computed from the urgency rule
    pub suggested_multiplier: f64,
    /// Nearest multiplier in the action space
    pub chosen_multiplier: f64,
    /// current_budget × chosen_multiplier
    pub suggested_budget: f64,
    pub action: AdjustmentAction,
    pub reason: AdjustmentReason,
    pub details: String,
    /// Learned values for the category (decrease, maintain, increase);
    /// informational only
    pub learned_values: [f64; 3],
}

/// Outcome of asking the policy engine for a suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AdjustmentOutcome {
    AdjustmentNeeded(BudgetSuggestion),
    NoAdjustmentNeeded { message: String },
}

/// Result of applying an adjustment and updating the value table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedAdjustment {
    pub category: Category,
    pub action: AdjustmentAction,
    pub new_budget: f64,
    pub remaining: f64,
    pub reward: f64,
    /// Updated value-table entry for (category, action)
    pub q_value: f64,
}

/// One forecast day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    /// Every transaction falls on one date: scaled mean of the last amounts
    SameDay,
    /// Fitted sequence model over the daily spend series
    SequenceModel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub method: ForecastMethod,
    pub points: Vec<ForecastPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ForecastOutcome {
    Success(Forecast),
    NotEnoughData {
        transaction_count: usize,
        required: usize,
        message: String,
    },
}

/// Cluster centers of transaction sizes, ascending
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpendingTiers {
    pub small: f64,
    pub medium: f64,
    pub large: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationSuggestion {
    pub suggested_amount: f64,
    pub suggested_categories: Vec<String>,
    pub suggested_reallocation: Category,
    pub tiers: SpendingTiers,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DonationOutcome {
    Success(DonationSuggestion),
    NotEnoughData {
        transaction_count: usize,
        required: usize,
        message: String,
    },
}
