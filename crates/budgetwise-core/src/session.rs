//! Session context
//!
//! A `Session` owns everything one user's engine needs: configuration,
//! ledger, policy engine (with its value table), forecaster and donation
//! sizer. It is passed explicitly to every operation.
//!
//! `SharedSession` is the handle for concurrent callers. Mutations take the
//! write lock for their whole duration, reads take the read lock, and no lock
//! is held across an `.await`.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::advisor::{
    AdjustmentOutcome, AppliedAdjustment, CategoryUtilization, DonationOutcome, DonationSizer,
    ForecastOutcome, Forecaster, PolicyEngine,
};
use crate::classifier::{Classification, ClassifierClient, TextClassifier};
use crate::config::BudgetConfig;
use crate::error::{Error, Result};
use crate::import::ImportedTransaction;
use crate::ledger::Ledger;
use crate::models::{
    AdjustmentAction, BudgetLine, Category, DonationRequest, Feedback, NewTransaction,
    Transaction,
};

/// Result of classifying and (maybe) recording an expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CategorizeOutcome {
    /// Confident classification; the expense is in the ledger
    Recorded { transaction: Transaction },
    /// Below the confidence threshold; nothing was recorded
    Uncertain(UncertainTransaction),
}

/// An expense waiting for the user to confirm its category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UncertainTransaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub suggested_category: Category,
    pub confidence: f64,
    /// Every category the user can choose from
    pub categories: Vec<String>,
}

/// Outcome of seeding a session from CSV rows
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportSummary {
    pub recorded: usize,
    /// Rows the classifier was unsure about (not recorded)
    pub uncertain: Vec<UncertainTransaction>,
}

/// One value-table row, labeled for export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueRow {
    pub category: Category,
    pub decrease: f64,
    pub maintain: f64,
    pub increase: f64,
}

/// Consistent view of a session's state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub budgets: Vec<BudgetLine>,
    pub transactions: Vec<Transaction>,
    pub donations: Vec<Transaction>,
    pub feedback: Vec<Feedback>,
    pub value_table: Vec<ValueRow>,
}

pub struct Session {
    config: BudgetConfig,
    ledger: Ledger,
    policy: PolicyEngine,
    forecaster: Forecaster,
    donation_sizer: DonationSizer,
}

impl Session {
    /// Create a session with a fresh ledger at the configured limits
    pub fn new(config: BudgetConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            ledger: Ledger::new(&config),
            policy: PolicyEngine::new(&config.policy, &config.thresholds),
            forecaster: Forecaster::new(&config.forecast),
            donation_sizer: DonationSizer::new(&config.donation),
            config,
        })
    }

    pub fn config(&self) -> &BudgetConfig {
        &self.config
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn policy(&self) -> &PolicyEngine {
        &self.policy
    }

    pub fn get_budgets(&self) -> &[BudgetLine] {
        self.ledger.get_budgets()
    }

    pub fn record_transaction(&mut self, tx: NewTransaction) -> Result<Transaction> {
        self.ledger.record_transaction(tx)
    }

    /// Record an expense under the category the user picked and remember the
    /// correction
    pub fn confirm_category(
        &mut self,
        date: NaiveDate,
        description: &str,
        amount: f64,
        category: Category,
    ) -> Result<Transaction> {
        let tx = self
            .ledger
            .record_transaction(NewTransaction::confirmed(date, description, amount, category))?;
        self.ledger.record_feedback(description, category);
        info!(category = %category, "Category confirmed by user");
        Ok(tx)
    }

    /// Record an expense from a classifier result, unless it is uncertain
    pub fn resolve_classification(
        &mut self,
        date: NaiveDate,
        description: &str,
        amount: f64,
        classification: &Classification,
    ) -> Result<CategorizeOutcome> {
        let (label, confidence) = classification
            .top()
            .ok_or_else(|| Error::Classifier("Classifier returned no labels".into()))?;
        let category: Category = label.parse().map_err(|_| {
            Error::Classifier(format!("Classifier returned unknown category '{}'", label))
        })?;

        if confidence < self.config.thresholds.confidence_threshold {
            debug!(category = %category, confidence, "Classification below threshold");
            return Ok(CategorizeOutcome::Uncertain(UncertainTransaction {
                date,
                description: description.to_string(),
                amount,
                suggested_category: category,
                confidence,
                categories: Category::labels().into_iter().map(String::from).collect(),
            }));
        }

        let transaction = self.ledger.record_transaction(NewTransaction {
            date,
            description: description.to_string(),
            amount,
            category,
            confidence,
        })?;
        Ok(CategorizeOutcome::Recorded { transaction })
    }

    pub fn utilization(&self) -> Vec<CategoryUtilization> {
        self.policy.analyzer().analyze(&self.ledger)
    }

    pub fn suggest_adjustment(&self) -> AdjustmentOutcome {
        self.policy.suggest(&self.ledger)
    }

    pub fn apply_adjustment(
        &mut self,
        category: Category,
        action: AdjustmentAction,
    ) -> Result<AppliedAdjustment> {
        self.policy.apply(&mut self.ledger, category, action)
    }

    /// Scale a category's limit directly (no learning)
    pub fn adjust_budget(&mut self, category: Category, multiplier: f64) -> Result<f64> {
        self.ledger.adjust_budget(category, multiplier)
    }

    pub fn forecast(&self) -> Result<ForecastOutcome> {
        self.forecaster.forecast(&self.ledger)
    }

    pub fn suggest_donation(&self) -> Result<DonationOutcome> {
        self.donation_sizer.suggest(&self.ledger)
    }

    pub fn record_donation(&mut self, request: DonationRequest) -> Result<Transaction> {
        self.ledger.record_donation(request)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let value_table = Category::ALL
            .iter()
            .map(|&category| {
                let [decrease, maintain, increase] = self.policy.value_table().row(category);
                ValueRow {
                    category,
                    decrease,
                    maintain,
                    increase,
                }
            })
            .collect();

        SessionSnapshot {
            budgets: self.ledger.get_budgets().to_vec(),
            transactions: self.ledger.transactions().to_vec(),
            donations: self.ledger.donations().to_vec(),
            feedback: self.ledger.feedback().to_vec(),
            value_table,
        }
    }
}

/// Lock-guarded session handle, cheap to clone
#[derive(Clone)]
pub struct SharedSession {
    inner: Arc<RwLock<Session>>,
}

impl std::fmt::Debug for SharedSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSession").finish_non_exhaustive()
    }
}

impl SharedSession {
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(RwLock::new(session)),
        }
    }

    /// Create a shared session from configuration
    pub fn from_config(config: BudgetConfig) -> Result<Self> {
        Ok(Self::new(Session::new(config)?))
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Session>> {
        self.inner
            .read()
            .map_err(|_| Error::InvalidData("Failed to acquire session read lock".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Session>> {
        self.inner
            .write()
            .map_err(|_| Error::InvalidData("Failed to acquire session write lock".into()))
    }

    pub fn get_budgets(&self) -> Result<Vec<BudgetLine>> {
        Ok(self.read()?.get_budgets().to_vec())
    }

    pub fn record_transaction(&self, tx: NewTransaction) -> Result<Transaction> {
        self.write()?.record_transaction(tx)
    }

    /// Classify a description and record the expense if the classifier is
    /// confident enough
    ///
    /// The classifier runs before any lock is taken.
    pub async fn categorize<C: TextClassifier + ?Sized>(
        &self,
        classifier: &C,
        date: NaiveDate,
        description: &str,
        amount: f64,
    ) -> Result<CategorizeOutcome> {
        if description.trim().is_empty() {
            return Err(Error::Validation("Description is required".into()));
        }
        if !(amount.is_finite() && amount > 0.0) {
            return Err(Error::Validation("Amount must be positive".into()));
        }

        let classification = classifier.classify(description, &Category::labels()).await?;
        self.write()?
            .resolve_classification(date, description, amount, &classification)
    }

    pub fn confirm_category(
        &self,
        date: NaiveDate,
        description: &str,
        amount: f64,
        category: Category,
    ) -> Result<Transaction> {
        self.write()?
            .confirm_category(date, description, amount, category)
    }

    /// Record imported rows in file order
    ///
    /// Rows that carry a category are recorded as confirmed. The rest go
    /// through the classifier; uncertain ones are returned, not recorded.
    pub async fn import(
        &self,
        rows: Vec<ImportedTransaction>,
        classifier: Option<&ClassifierClient>,
    ) -> Result<ImportSummary> {
        let mut summary = ImportSummary::default();

        for row in rows {
            match row.category {
                Some(category) => {
                    self.record_transaction(NewTransaction::confirmed(
                        row.date,
                        row.description,
                        row.amount,
                        category,
                    ))?;
                    summary.recorded += 1;
                }
                None => {
                    let classifier = classifier.ok_or_else(|| {
                        Error::Import(format!(
                            "Line {} has no category and no classifier is configured",
                            row.line
                        ))
                    })?;
                    match self
                        .categorize(classifier, row.date, &row.description, row.amount)
                        .await?
                    {
                        CategorizeOutcome::Recorded { .. } => summary.recorded += 1,
                        CategorizeOutcome::Uncertain(pending) => {
                            warn!(
                                line = row.line,
                                description = %pending.description,
                                "Skipping uncertain row"
                            );
                            summary.uncertain.push(pending);
                        }
                    }
                }
            }
        }

        info!(
            recorded = summary.recorded,
            uncertain = summary.uncertain.len(),
            "Import finished"
        );
        Ok(summary)
    }

    pub fn utilization(&self) -> Result<Vec<CategoryUtilization>> {
        Ok(self.read()?.utilization())
    }

    pub fn suggest_adjustment(&self) -> Result<AdjustmentOutcome> {
        Ok(self.read()?.suggest_adjustment())
    }

    pub fn apply_adjustment(
        &self,
        category: Category,
        action: AdjustmentAction,
    ) -> Result<AppliedAdjustment> {
        self.write()?.apply_adjustment(category, action)
    }

    pub fn adjust_budget(&self, category: Category, multiplier: f64) -> Result<f64> {
        self.write()?.adjust_budget(category, multiplier)
    }

    pub fn forecast(&self) -> Result<ForecastOutcome> {
        self.read()?.forecast()
    }

    pub fn suggest_donation(&self) -> Result<DonationOutcome> {
        self.read()?.suggest_donation()
    }

    pub fn record_donation(&self, request: DonationRequest) -> Result<Transaction> {
        self.write()?.record_donation(request)
    }

    pub fn snapshot(&self) -> Result<SessionSnapshot> {
        Ok(self.read()?.snapshot())
    }
}
