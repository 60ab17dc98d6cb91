//! Budget ledger: per-category limits and remaining budgets plus the ordered
//! transaction history.
//!
//! `remaining` is decremented as expenses arrive rather than recomputed from
//! history, so every method that appends to history also updates the budget
//! line in the same call. Callers must hold exclusive access (see
//! [`crate::session::SharedSession`]) for the duration of any mutation.

use tracing::{debug, info};

use crate::config::BudgetConfig;
use crate::error::{Error, Result};
use crate::models::{
    BudgetLine, Category, DonationRequest, Feedback, NewTransaction, Transaction,
    TransactionCategory,
};

#[derive(Debug, Clone)]
pub struct Ledger {
    /// One line per category, in canonical order
    lines: Vec<BudgetLine>,
    transactions: Vec<Transaction>,
    donations: Vec<Transaction>,
    feedback: Vec<Feedback>,
    charity_categories: Vec<String>,
}

impl Ledger {
    /// Create a ledger with every category at its configured initial limit
    pub fn new(config: &BudgetConfig) -> Self {
        let lines = Category::ALL
            .iter()
            .map(|&category| {
                let limit = config.initial_limit(category);
                BudgetLine {
                    category,
                    limit,
                    remaining: limit,
                }
            })
            .collect();

        Self {
            lines,
            transactions: Vec::new(),
            donations: Vec::new(),
            feedback: Vec::new(),
            charity_categories: config.charity_categories.clone(),
        }
    }

    /// All budget lines, in canonical category order
    pub fn get_budgets(&self) -> &[BudgetLine] {
        &self.lines
    }

    pub fn line(&self, category: Category) -> &BudgetLine {
        &self.lines[category.index()]
    }

    pub fn limit(&self, category: Category) -> f64 {
        self.line(category).limit
    }

    pub fn remaining(&self, category: Category) -> f64 {
        self.line(category).remaining
    }

    pub fn spent(&self, category: Category) -> f64 {
        self.line(category).spent()
    }

    /// Full history, oldest first (expenses and donations)
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn donations(&self) -> &[Transaction] {
        &self.donations
    }

    pub fn feedback(&self) -> &[Feedback] {
        &self.feedback
    }

    pub fn charity_categories(&self) -> &[String] {
        &self.charity_categories
    }

    /// Record an expense: append it to history and charge its category
    pub fn record_transaction(&mut self, tx: NewTransaction) -> Result<Transaction> {
        if !(tx.amount.is_finite() && tx.amount > 0.0) {
            return Err(Error::Validation("Amount must be positive".into()));
        }
        if !(0.0..=1.0).contains(&tx.confidence) {
            return Err(Error::Validation(format!(
                "Confidence must be between 0 and 1, got {}",
                tx.confidence
            )));
        }

        let line = &mut self.lines[tx.category.index()];
        line.remaining -= tx.amount;
        debug!(
            category = %tx.category,
            amount = tx.amount,
            remaining = line.remaining,
            "Recorded transaction"
        );

        let recorded = Transaction {
            date: tx.date,
            description: tx.description,
            amount: tx.amount,
            category: TransactionCategory::Budget(tx.category),
            confidence: tx.confidence,
            charity_category: None,
            reallocation_category: None,
        };
        self.transactions.push(recorded.clone());

        Ok(recorded)
    }

    /// Remember a user-supplied category correction
    pub fn record_feedback(&mut self, description: impl Into<String>, category: Category) {
        self.feedback.push(Feedback {
            description: description.into(),
            correct_category: category,
        });
    }

    /// Scale a category's limit, keeping the amount already spent
    ///
    /// Returns the new limit.
    pub fn adjust_budget(&mut self, category: Category, multiplier: f64) -> Result<f64> {
        if !(multiplier.is_finite() && multiplier > 0.0) {
            return Err(Error::Validation(format!(
                "Budget multiplier must be positive, got {}",
                multiplier
            )));
        }

        let line = &mut self.lines[category.index()];
        let spent = line.spent();
        line.limit *= multiplier;
        line.remaining = line.limit - spent;

        info!(
            category = %category,
            multiplier,
            new_limit = line.limit,
            "Adjusted budget"
        );
        Ok(line.limit)
    }

    /// Clear spend tracking for a category (remaining = limit)
    pub fn reset_remaining(&mut self, category: Category) {
        let line = &mut self.lines[category.index()];
        line.remaining = line.limit;
    }

    /// Record a charitable donation, optionally funded from a budget category
    ///
    /// All validation happens before anything is written, so a rejected
    /// request leaves the ledger untouched.
    pub fn record_donation(&mut self, request: DonationRequest) -> Result<Transaction> {
        if !(request.amount.is_finite() && request.amount > 0.0) {
            return Err(Error::Validation("Amount must be positive".into()));
        }

        let charity = request.charity_category.trim();
        if charity.is_empty() || !self.charity_categories.iter().any(|c| c == charity) {
            return Err(Error::Validation("Invalid charity category".into()));
        }

        let reallocation = match request
            .reallocation_category
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            Some(name) => {
                let category: Category = name
                    .parse()
                    .map_err(|_| Error::Validation("Invalid reallocation category".into()))?;
                if self.remaining(category) < request.amount {
                    return Err(Error::Validation(format!(
                        "Not enough budget in {} to reallocate",
                        category
                    )));
                }
                Some(category)
            }
            None => None,
        };

        if let Some(category) = reallocation {
            self.lines[category.index()].remaining -= request.amount;
        }

        let donation = Transaction {
            date: request.date,
            description: format!("Donation to {}", charity),
            amount: -request.amount,
            category: TransactionCategory::Charity,
            confidence: 1.0,
            charity_category: Some(charity.to_string()),
            reallocation_category: reallocation,
        };
        self.donations.push(donation.clone());
        self.transactions.push(donation.clone());

        info!(
            charity = %charity,
            amount = request.amount,
            reallocation = ?reallocation,
            "Recorded donation"
        );
        Ok(donation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn ledger() -> Ledger {
        Ledger::new(&BudgetConfig::default())
    }

    fn expense(category: Category, amount: f64) -> NewTransaction {
        NewTransaction::confirmed(date(1), "test", amount, category)
    }

    fn donation(amount: f64, charity: &str, from: Option<&str>) -> DonationRequest {
        DonationRequest {
            date: date(2),
            amount,
            charity_category: charity.to_string(),
            reallocation_category: from.map(|s| s.to_string()),
        }
    }

    #[test]
    fn test_new_ledger_starts_at_initial_limits() {
        let ledger = ledger();
        assert_eq!(ledger.get_budgets().len(), Category::ALL.len());
        assert_eq!(ledger.limit(Category::Food), 500.0);
        assert_eq!(ledger.remaining(Category::Food), 500.0);
        assert_eq!(ledger.spent(Category::Food), 0.0);
    }

    #[test]
    fn test_remaining_tracks_history() {
        let mut ledger = ledger();
        ledger.record_transaction(expense(Category::Food, 12.5)).unwrap();
        ledger.record_transaction(expense(Category::Food, 40.0)).unwrap();
        ledger.record_transaction(expense(Category::Shopping, 99.0)).unwrap();

        for line in ledger.get_budgets() {
            let charged: f64 = ledger
                .transactions()
                .iter()
                .filter(|t| t.category.budget() == Some(line.category))
                .map(|t| t.amount)
                .sum();
            assert!((line.remaining - (line.limit - charged)).abs() < 1e-9);
        }
        assert_eq!(ledger.transaction_count(), 3);
    }

    #[test]
    fn test_overspending_goes_negative() {
        let mut ledger = ledger();
        ledger
            .record_transaction(expense(Category::Subscriptions, 80.0))
            .unwrap();
        assert_eq!(ledger.remaining(Category::Subscriptions), -30.0);
        assert_eq!(ledger.spent(Category::Subscriptions), 80.0);
    }

    #[test]
    fn test_non_positive_amount_rejected_without_side_effects() {
        let mut ledger = ledger();
        for amount in [0.0, -5.0, f64::NAN] {
            let err = ledger
                .record_transaction(expense(Category::Food, amount))
                .unwrap_err();
            assert!(err.is_client_error());
        }
        assert_eq!(ledger.transaction_count(), 0);
        assert_eq!(ledger.remaining(Category::Food), 500.0);
    }

    #[test]
    fn test_adjust_budget_keeps_spent() {
        let mut ledger = ledger();
        ledger.record_transaction(expense(Category::Food, 100.0)).unwrap();

        let new_limit = ledger.adjust_budget(Category::Food, 1.1).unwrap();
        assert!((new_limit - 550.0).abs() < 1e-9);
        assert!((ledger.spent(Category::Food) - 100.0).abs() < 1e-9);
        assert!((ledger.remaining(Category::Food) - 450.0).abs() < 1e-9);

        assert!(ledger.adjust_budget(Category::Food, 0.0).is_err());
    }

    #[test]
    fn test_reset_remaining() {
        let mut ledger = ledger();
        ledger.record_transaction(expense(Category::Other, 70.0)).unwrap();
        ledger.reset_remaining(Category::Other);
        assert_eq!(ledger.remaining(Category::Other), 100.0);
        // History is kept
        assert_eq!(ledger.transaction_count(), 1);
    }

    #[test]
    fn test_donation_with_reallocation() {
        let mut ledger = ledger();
        let tx = ledger
            .record_donation(donation(25.0, "Health", Some("Entertainment")))
            .unwrap();

        assert_eq!(tx.amount, -25.0);
        assert_eq!(tx.category, TransactionCategory::Charity);
        assert_eq!(tx.description, "Donation to Health");
        assert_eq!(tx.reallocation_category, Some(Category::Entertainment));
        assert_eq!(ledger.remaining(Category::Entertainment), 125.0);
        assert_eq!(ledger.donations().len(), 1);
        assert_eq!(ledger.transactions().len(), 1);
    }

    #[test]
    fn test_donation_without_reallocation() {
        let mut ledger = ledger();
        let before = ledger.get_budgets().to_vec();
        let tx = ledger
            .record_donation(donation(10.0, "Education", Some("  ")))
            .unwrap();
        assert_eq!(tx.reallocation_category, None);
        assert_eq!(ledger.get_budgets(), before.as_slice());
    }

    #[test]
    fn test_donation_validation() {
        let mut ledger = ledger();

        let err = ledger.record_donation(donation(0.0, "Health", None)).unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Amount must be positive");

        let err = ledger.record_donation(donation(5.0, "Sports", None)).unwrap_err();
        assert!(err.to_string().contains("Invalid charity category"));

        let err = ledger
            .record_donation(donation(5.0, "Health", Some("Travel")))
            .unwrap_err();
        assert!(err.to_string().contains("Invalid reallocation category"));
    }

    #[test]
    fn test_donation_exceeding_remaining_leaves_ledger_unchanged() {
        let mut ledger = ledger();
        ledger
            .record_transaction(expense(Category::Utilities, 90.0))
            .unwrap();
        let budgets_before = ledger.get_budgets().to_vec();
        let history_before = ledger.transactions().to_vec();

        let err = ledger
            .record_donation(donation(20.0, "Environment", Some("Utilities")))
            .unwrap_err();

        assert!(err.is_client_error());
        assert!(err.to_string().contains("Not enough budget in Utilities"));
        assert_eq!(ledger.get_budgets(), budgets_before.as_slice());
        assert_eq!(ledger.transactions(), history_before.as_slice());
        assert!(ledger.donations().is_empty());
    }

    #[test]
    fn test_feedback_recorded() {
        let mut ledger = ledger();
        ledger.record_feedback("gym membership", Category::Healthcare);
        assert_eq!(ledger.feedback().len(), 1);
        assert_eq!(ledger.feedback()[0].correct_category, Category::Healthcare);
    }
}
