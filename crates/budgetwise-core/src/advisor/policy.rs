//! Policy Engine
//!
//! Turns the most urgent category into a budget suggestion and learns from
//! applied adjustments with a tabular Q-value update.
//!
//! Suggestions are rule-based: the value table is updated on every applied
//! adjustment and reported alongside suggestions, but it does not choose the
//! action.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{PolicyConfig, ThresholdConfig};
use crate::error::Result;
use crate::ledger::Ledger;
use crate::models::{AdjustmentAction, AdjustmentReason, Category};

use super::types::{AdjustmentOutcome, AppliedAdjustment, BudgetSuggestion, CategoryUtilization};
use super::utilization::UtilizationAnalyzer;

/// Overspent categories get at least this multiplier
const OVERSPENT_MIN_MULTIPLIER: f64 = 1.2;
/// Nearing-limit categories get at most this multiplier
const NEARING_MAX_MULTIPLIER: f64 = 1.5;
/// Underutilized categories get at least this multiplier
const UNDERUTILIZED_MIN_MULTIPLIER: f64 = 0.7;

const REWARD_GOOD: f64 = 1.0;
const REWARD_BAD: f64 = -1.0;
const REWARD_INSUFFICIENT: f64 = -0.5;

/// Dense per-category, per-action value estimates
///
/// Rows follow canonical category order; columns are decrease, maintain,
/// increase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueTable {
    rows: Vec<[f64; 3]>,
}

impl ValueTable {
    pub fn new() -> Self {
        Self {
            rows: vec![[0.0; 3]; Category::ALL.len()],
        }
    }

    pub fn row(&self, category: Category) -> [f64; 3] {
        self.rows[category.index()]
    }

    pub fn get(&self, category: Category, action: AdjustmentAction) -> f64 {
        self.rows[category.index()][action.index()]
    }

    /// Best known value for a category
    pub fn max_value(&self, category: Category) -> f64 {
        self.row(category)
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn rows(&self) -> &[[f64; 3]] {
        &self.rows
    }

    fn set(&mut self, category: Category, action: AdjustmentAction, value: f64) {
        self.rows[category.index()][action.index()] = value;
    }
}

impl Default for ValueTable {
    fn default() -> Self {
        Self::new()
    }
}

pub struct PolicyEngine {
    config: PolicyConfig,
    /// Target spend ratio after an increase; same as the nearing-limit threshold
    headroom_ratio: f64,
    analyzer: UtilizationAnalyzer,
    values: ValueTable,
}

impl PolicyEngine {
    pub fn new(config: &PolicyConfig, thresholds: &ThresholdConfig) -> Self {
        Self {
            config: config.clone(),
            headroom_ratio: thresholds.nearing_limit_ratio,
            analyzer: UtilizationAnalyzer::new(thresholds),
            values: ValueTable::new(),
        }
    }

    pub fn analyzer(&self) -> &UtilizationAnalyzer {
        &self.analyzer
    }

    pub fn value_table(&self) -> &ValueTable {
        &self.values
    }

    pub fn action_space(&self) -> [f64; 3] {
        self.config.action_space
    }

    /// Suggest an adjustment for the most urgent category
    pub fn suggest(&self, ledger: &Ledger) -> AdjustmentOutcome {
        let analysis = self.analyzer.analyze(ledger);

        let Some((target, reason)) = self.analyzer.select_target(&analysis) else {
            debug!("All categories within range");
            return AdjustmentOutcome::NoAdjustmentNeeded {
                message: "All budgets are within optimal ranges".to_string(),
            };
        };

        let suggestion = self.build_suggestion(target, reason);
        info!(
            category = %suggestion.category,
            reason = %reason,
            suggested = suggestion.suggested_multiplier,
            chosen = suggestion.chosen_multiplier,
            "Budget adjustment suggested"
        );
        AdjustmentOutcome::AdjustmentNeeded(suggestion)
    }

    fn build_suggestion(
        &self,
        target: &CategoryUtilization,
        reason: AdjustmentReason,
    ) -> BudgetSuggestion {
        let suggested = self.suggested_multiplier(target, reason);
        let (_, chosen) = self.discretize(suggested);

        BudgetSuggestion {
            category: target.category,
            current_budget: target.current_budget,
            spent: target.spent,
            remaining: target.remaining,
            spending_ratio: target.spending_ratio,
            suggested_multiplier: suggested,
            chosen_multiplier: chosen,
            suggested_budget: target.current_budget * chosen,
            action: reason.action(),
            reason,
            details: format!(
                "Category is {} (used {:.1}% of budget)",
                reason.as_str().replace('_', " "),
                target.spending_ratio * 100.0
            ),
            learned_values: self.values.row(target.category),
        }
    }

    /// Continuous multiplier for a category flagged with `reason`
    pub fn suggested_multiplier(
        &self,
        target: &CategoryUtilization,
        reason: AdjustmentReason,
    ) -> f64 {
        let headroom = (target.spent / self.headroom_ratio) / target.current_budget;
        match reason {
            AdjustmentReason::Overspent => headroom.max(OVERSPENT_MIN_MULTIPLIER),
            AdjustmentReason::NearingLimit => headroom.min(NEARING_MAX_MULTIPLIER),
            AdjustmentReason::Underutilized => {
                (0.5 + target.spending_ratio / 2.0).max(UNDERUTILIZED_MIN_MULTIPLIER)
            }
        }
    }

    /// Nearest action-space multiplier; on a tie the earlier action wins
    pub fn discretize(&self, suggested: f64) -> (AdjustmentAction, f64) {
        let mut best = AdjustmentAction::ALL[0];
        let mut best_distance = f64::INFINITY;
        for action in AdjustmentAction::ALL {
            let distance = (suggested - self.config.multiplier(action)).abs();
            if distance < best_distance {
                best = action;
                best_distance = distance;
            }
        }
        (best, self.config.multiplier(best))
    }

    /// Apply an accepted adjustment and learn from it
    ///
    /// Scales the category limit, scores the change, updates the value table
    /// and clears the category's spend tracking.
    pub fn apply(
        &mut self,
        ledger: &mut Ledger,
        category: Category,
        action: AdjustmentAction,
    ) -> Result<AppliedAdjustment> {
        let spent = ledger.spent(category);
        let was_overspent = ledger.remaining(category) < 0.0;

        let new_budget = ledger.adjust_budget(category, self.config.multiplier(action))?;

        let reward = if was_overspent {
            if action == AdjustmentAction::Increase {
                REWARD_GOOD
            } else {
                REWARD_BAD
            }
        } else if spent / new_budget < self.headroom_ratio {
            REWARD_GOOD
        } else {
            REWARD_INSUFFICIENT
        };

        let q_value = self.update_value(category, action, reward);
        ledger.reset_remaining(category);

        info!(
            category = %category,
            action = %action,
            new_budget,
            reward,
            q_value,
            "Budget adjustment applied"
        );

        Ok(AppliedAdjustment {
            category,
            action,
            new_budget,
            remaining: ledger.remaining(category),
            reward,
            q_value,
        })
    }

    /// Single-step bootstrapped update of one table entry; returns the new value
    fn update_value(&mut self, category: Category, action: AdjustmentAction, reward: f64) -> f64 {
        let alpha = self.config.learning_rate;
        let gamma = self.config.discount_factor;
        let current = self.values.get(category, action);
        let future = self.values.max_value(category);

        let updated = (1.0 - alpha) * current + alpha * (reward + gamma * future);
        self.values.set(category, action, updated);
        updated
    }
}
