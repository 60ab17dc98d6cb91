//! Donation Sizer
//!
//! Groups transaction amounts into small, medium and large tiers and suggests
//! donating a share of a typical medium purchase, funded from the least-used
//! budget category.

use tracing::{debug, info};

use crate::config::DonationConfig;
use crate::error::{Error, Result};
use crate::ledger::Ledger;
use crate::models::Category;

use super::kmeans::cluster_centers;
use super::types::{DonationOutcome, DonationSuggestion, SpendingTiers};

pub struct DonationSizer {
    config: DonationConfig,
}

impl DonationSizer {
    pub fn new(config: &DonationConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    pub fn suggest(&self, ledger: &Ledger) -> Result<DonationOutcome> {
        let count = ledger.transaction_count();
        if count < self.config.min_transactions {
            debug!(count, "Not enough transactions for a donation suggestion");
            return Ok(DonationOutcome::NotEnoughData {
                transaction_count: count,
                required: self.config.min_transactions,
                message: format!(
                    "We need at least {} transactions to make charity suggestions",
                    self.config.min_transactions
                ),
            });
        }

        let amounts: Vec<f64> = ledger.transactions().iter().map(|t| t.amount).collect();
        let centers = cluster_centers(&amounts, self.config.clusters)
            .map_err(|e| Error::computation(format!("Clustering failed: {}", e), count))?;
        let tiers = tiers_from(&centers)
            .ok_or_else(|| Error::computation("Clustering produced no centers", count))?;

        let suggested_amount = round_cents(tiers.medium * self.config.rate);
        let suggested_reallocation = least_utilized(ledger);

        info!(
            amount = suggested_amount,
            reallocation = %suggested_reallocation,
            "Donation suggestion"
        );
        Ok(DonationOutcome::Success(DonationSuggestion {
            suggested_amount,
            suggested_categories: ledger.charity_categories().to_vec(),
            suggested_reallocation,
            tiers,
            message: format!(
                "Based on your spending patterns, we suggest donating ${:.2}",
                suggested_amount
            ),
        }))
    }
}

/// Small, medium and large tiers from ascending centers
///
/// With more than three clusters the middle one is the medium tier.
fn tiers_from(centers: &[f64]) -> Option<SpendingTiers> {
    Some(SpendingTiers {
        small: *centers.first()?,
        medium: *centers.get(centers.len() / 2)?,
        large: *centers.last()?,
    })
}

/// Category with the lowest spent / limit; ties keep category order
fn least_utilized(ledger: &Ledger) -> Category {
    let mut best = Category::ALL[0];
    let mut best_ratio = f64::INFINITY;
    for line in ledger.get_budgets() {
        let ratio = line.spent() / line.limit;
        if ratio < best_ratio {
            best = line.category;
            best_ratio = ratio;
        }
    }
    best
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
