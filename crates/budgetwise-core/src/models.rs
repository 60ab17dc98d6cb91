//! Domain models for Budgetwise

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A budget bucket from the fixed category set
///
/// Declaration order is the canonical index order: it sizes the policy
/// value table and breaks ties wherever categories are ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transportation,
    Entertainment,
    Utilities,
    Shopping,
    Subscriptions,
    Healthcare,
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Self::Food,
        Self::Transportation,
        Self::Entertainment,
        Self::Utilities,
        Self::Shopping,
        Self::Subscriptions,
        Self::Healthcare,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Transportation => "Transportation",
            Self::Entertainment => "Entertainment",
            Self::Utilities => "Utilities",
            Self::Shopping => "Shopping",
            Self::Subscriptions => "Subscriptions",
            Self::Healthcare => "Healthcare",
            Self::Other => "Other",
        }
    }

    /// Position in [`Category::ALL`]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Display names of every category, in canonical order
    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.as_str()).collect()
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "food" => Ok(Self::Food),
            "transportation" | "transport" => Ok(Self::Transportation),
            "entertainment" => Ok(Self::Entertainment),
            "utilities" => Ok(Self::Utilities),
            "shopping" => Ok(Self::Shopping),
            "subscriptions" => Ok(Self::Subscriptions),
            "healthcare" => Ok(Self::Healthcare),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Category recorded on a history entry: a budget bucket, or the synthetic
/// charity bucket used by donations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum TransactionCategory {
    Budget(Category),
    Charity,
}

impl TransactionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Budget(category) => category.as_str(),
            Self::Charity => "Charity",
        }
    }

    pub fn budget(&self) -> Option<Category> {
        match self {
            Self::Budget(category) => Some(*category),
            Self::Charity => None,
        }
    }
}

impl From<TransactionCategory> for String {
    fn from(value: TransactionCategory) -> Self {
        value.as_str().to_string()
    }
}

impl TryFrom<String> for TransactionCategory {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        if value.eq_ignore_ascii_case("charity") {
            return Ok(Self::Charity);
        }
        value.parse().map(Self::Budget)
    }
}

impl std::fmt::Display for TransactionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded history entry (immutable once appended)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub description: String,
    /// Positive for expenses, negative for donations
    pub amount: f64,
    pub category: TransactionCategory,
    /// Classifier confidence (1.0 when the user picked the category)
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charity_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reallocation_category: Option<Category>,
}

/// An expense to be recorded against a budget category
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub category: Category,
    pub confidence: f64,
}

impl NewTransaction {
    /// Expense the user categorized by hand (full confidence)
    pub fn confirmed(
        date: NaiveDate,
        description: impl Into<String>,
        amount: f64,
        category: Category,
    ) -> Self {
        Self {
            date,
            description: description.into(),
            amount,
            category,
            confidence: 1.0,
        }
    }
}

/// Request to record a charitable donation
#[derive(Debug, Clone, PartialEq)]
pub struct DonationRequest {
    pub date: NaiveDate,
    pub amount: f64,
    /// Must be one of the configured charity categories
    pub charity_category: String,
    /// Budget category that funds the donation; blank means none
    pub reallocation_category: Option<String>,
}

/// A category correction supplied by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub description: String,
    pub correct_category: Category,
}

/// Current limit and remaining budget for one category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetLine {
    pub category: Category,
    pub limit: f64,
    pub remaining: f64,
}

impl BudgetLine {
    pub fn spent(&self) -> f64 {
        self.limit - self.remaining
    }
}

/// Budget adjustment a caller can apply
///
/// Discriminants are the action indices of the policy value table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentAction {
    Decrease = 0,
    Maintain = 1,
    Increase = 2,
}

impl AdjustmentAction {
    pub const ALL: [AdjustmentAction; 3] = [Self::Decrease, Self::Maintain, Self::Increase];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Decrease => "decrease",
            Self::Maintain => "maintain",
            Self::Increase => "increase",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl std::str::FromStr for AdjustmentAction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "decrease" => Ok(Self::Decrease),
            "maintain" => Ok(Self::Maintain),
            "increase" => Ok(Self::Increase),
            _ => Err(format!("Unknown adjustment action: {}", s)),
        }
    }
}

impl std::fmt::Display for AdjustmentAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a category was picked for adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentReason {
    Overspent,
    NearingLimit,
    Underutilized,
}

impl AdjustmentReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overspent => "overspent",
            Self::NearingLimit => "nearing_limit",
            Self::Underutilized => "underutilized",
        }
    }

    /// Direction of the suggested change
    pub fn action(&self) -> AdjustmentAction {
        match self {
            Self::Overspent | Self::NearingLimit => AdjustmentAction::Increase,
            Self::Underutilized => AdjustmentAction::Decrease,
        }
    }
}

impl std::fmt::Display for AdjustmentReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_index_matches_canonical_order() {
        for (i, category) in Category::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
    }

    #[test]
    fn test_category_parse_is_case_insensitive() {
        assert_eq!("food".parse::<Category>().unwrap(), Category::Food);
        assert_eq!(" Healthcare ".parse::<Category>().unwrap(), Category::Healthcare);
        assert!("Charity".parse::<Category>().is_err());
    }

    #[test]
    fn test_transaction_category_serializes_as_plain_string() {
        let json = serde_json::to_string(&TransactionCategory::Charity).unwrap();
        assert_eq!(json, "\"Charity\"");

        let parsed: TransactionCategory = serde_json::from_str("\"Shopping\"").unwrap();
        assert_eq!(parsed, TransactionCategory::Budget(Category::Shopping));
    }

    #[test]
    fn test_action_indices_are_fixed() {
        assert_eq!(AdjustmentAction::Decrease.index(), 0);
        assert_eq!(AdjustmentAction::Maintain.index(), 1);
        assert_eq!(AdjustmentAction::Increase.index(), 2);
        assert_eq!(
            "MAINTAIN".parse::<AdjustmentAction>().unwrap(),
            AdjustmentAction::Maintain
        );
    }

    #[test]
    fn test_reason_direction() {
        assert_eq!(AdjustmentReason::Overspent.action(), AdjustmentAction::Increase);
        assert_eq!(AdjustmentReason::NearingLimit.action(), AdjustmentAction::Increase);
        assert_eq!(AdjustmentReason::Underutilized.action(), AdjustmentAction::Decrease);
        assert_eq!(AdjustmentReason::NearingLimit.as_str(), "nearing_limit");
    }
}
