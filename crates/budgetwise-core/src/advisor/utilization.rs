//! Utilization Analyzer
//!
//! Scores every category by how much of its limit has been spent and picks
//! the single most urgent one. Priority is overspent, then nearing the limit,
//! then underutilized; within a group:
//! - overspent: most negative remaining budget first
//! - nearing limit: highest spending ratio first
//! - underutilized: lowest spending ratio first
//!
//! Remaining ties keep canonical category order.

use std::cmp::Ordering;

use crate::config::ThresholdConfig;
use crate::ledger::Ledger;
use crate::models::AdjustmentReason;

use super::types::{CategoryUtilization, UtilizationStatus};

pub struct UtilizationAnalyzer {
    nearing_limit_ratio: f64,
    underutilized_ratio: f64,
}

impl UtilizationAnalyzer {
    pub fn new(thresholds: &ThresholdConfig) -> Self {
        Self {
            nearing_limit_ratio: thresholds.nearing_limit_ratio,
            underutilized_ratio: thresholds.underutilized_ratio,
        }
    }

    /// Analyze every category, in canonical order
    pub fn analyze(&self, ledger: &Ledger) -> Vec<CategoryUtilization> {
        ledger
            .get_budgets()
            .iter()
            .map(|line| {
                let spent = line.spent();
                let spending_ratio = spent / line.limit;
                let overspent = line.remaining < 0.0;
                let underutilized = spending_ratio < self.underutilized_ratio;

                let status = if overspent {
                    UtilizationStatus::Overspent
                } else if spending_ratio > self.nearing_limit_ratio {
                    UtilizationStatus::NearingLimit
                } else if underutilized {
                    UtilizationStatus::Underutilized
                } else {
                    UtilizationStatus::Healthy
                };

                CategoryUtilization {
                    category: line.category,
                    current_budget: line.limit,
                    spent,
                    remaining: line.remaining,
                    spending_ratio,
                    overspent,
                    underutilized,
                    status,
                }
            })
            .collect()
    }

    /// Pick the category most in need of an adjustment
    ///
    /// Returns `None` when every category is healthy.
    pub fn select_target<'a>(
        &self,
        analysis: &'a [CategoryUtilization],
    ) -> Option<(&'a CategoryUtilization, AdjustmentReason)> {
        if let Some(u) = first_by(analysis, UtilizationStatus::Overspent, |a, b| {
            a.remaining.total_cmp(&b.remaining)
        }) {
            return Some((u, AdjustmentReason::Overspent));
        }
        if let Some(u) = first_by(analysis, UtilizationStatus::NearingLimit, |a, b| {
            b.spending_ratio.total_cmp(&a.spending_ratio)
        }) {
            return Some((u, AdjustmentReason::NearingLimit));
        }
        first_by(analysis, UtilizationStatus::Underutilized, |a, b| {
            a.spending_ratio.total_cmp(&b.spending_ratio)
        })
        .map(|u| (u, AdjustmentReason::Underutilized))
    }
}

/// First entry with `status` under `order`; stable, so ties keep category order
fn first_by<'a>(
    analysis: &'a [CategoryUtilization],
    status: UtilizationStatus,
    order: impl Fn(&CategoryUtilization, &CategoryUtilization) -> Ordering,
) -> Option<&'a CategoryUtilization> {
    let mut group: Vec<&CategoryUtilization> =
        analysis.iter().filter(|u| u.status == status).collect();
    group.sort_by(|a, b| order(a, b));
    group.first().copied()
}
