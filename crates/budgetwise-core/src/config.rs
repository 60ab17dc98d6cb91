//! Budget configuration
//!
//! The fixed enumerations the engine is defined over (category limits,
//! charity categories, action space) live here rather than in code, together
//! with thresholds and learning constants.
//!
//! ## Configuration Resolution
//!
//! 1. Explicit path (e.g. `--config`), if given and present
//! 2. Override in data dir (~/.local/share/budgetwise/config/budget.toml)
//! 3. Embedded defaults (compiled into binary)

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{AdjustmentAction, Category};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/budget.toml");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetConfig {
    /// Causes a donation may be directed to
    pub charity_categories: Vec<String>,
    /// Initial limit per category, keyed by category name
    pub budgets: BTreeMap<String, f64>,
    pub policy: PolicyConfig,
    #[serde(default)]
    pub thresholds: ThresholdConfig,
    #[serde(default)]
    pub forecast: ForecastConfig,
    #[serde(default)]
    pub donation: DonationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Multipliers for decrease, maintain, increase (in that order)
    pub action_space: [f64; 3],
    pub learning_rate: f64,
    pub discount_factor: f64,
}

impl PolicyConfig {
    pub fn multiplier(&self, action: AdjustmentAction) -> f64 {
        self.action_space[action.index()]
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            action_space: [0.9, 1.0, 1.1],
            learning_rate: 0.1,
            discount_factor: 0.9,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    pub nearing_limit_ratio: f64,
    pub underutilized_ratio: f64,
    pub confidence_threshold: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            nearing_limit_ratio: 0.8,
            underutilized_ratio: 0.5,
            confidence_threshold: 0.7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    pub min_transactions: usize,
    pub horizon_days: usize,
    pub window: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            min_transactions: 3,
            horizon_days: 3,
            window: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationConfig {
    pub min_transactions: usize,
    /// Share of the medium transaction size suggested as a donation
    pub rate: f64,
    pub clusters: usize,
}

impl Default for DonationConfig {
    fn default() -> Self {
        Self {
            min_transactions: 5,
            rate: 0.05,
            clusters: 3,
        }
    }
}

impl Default for BudgetConfig {
    fn default() -> Self {
        let limits = [
            (Category::Food, 500.0),
            (Category::Transportation, 200.0),
            (Category::Entertainment, 150.0),
            (Category::Utilities, 100.0),
            (Category::Shopping, 200.0),
            (Category::Subscriptions, 50.0),
            (Category::Healthcare, 100.0),
            (Category::Other, 100.0),
        ];
        Self {
            charity_categories: [
                "Education",
                "Health",
                "Environment",
                "Poverty Alleviation",
                "Animal Welfare",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            budgets: limits
                .iter()
                .map(|(c, l)| (c.as_str().to_string(), *l))
                .collect(),
            policy: PolicyConfig::default(),
            thresholds: ThresholdConfig::default(),
            forecast: ForecastConfig::default(),
            donation: DonationConfig::default(),
        }
    }
}

impl BudgetConfig {
    /// Load configuration (explicit path, then override location, then embedded)
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let candidate = match path {
            Some(p) => Some(p.to_path_buf()),
            None => default_config_path(),
        };

        let content = match candidate {
            Some(p) if p.exists() => {
                debug!(path = %p.display(), "Loading budget config");
                fs::read_to_string(&p)
                    .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?
            }
            Some(p) if path.is_some() => {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            _ => DEFAULT_CONFIG.to_string(),
        };

        Self::from_toml_str(&content)
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: BudgetConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants the engine relies on
    pub fn validate(&self) -> Result<()> {
        for name in self.budgets.keys() {
            name.parse::<Category>()
                .map_err(|e| Error::Config(format!("[budgets] {}", e)))?;
        }
        for category in Category::ALL {
            let limit = self.lookup_limit(category).ok_or_else(|| {
                Error::Config(format!("[budgets] missing limit for {}", category))
            })?;
            if !(limit.is_finite() && limit > 0.0) {
                return Err(Error::Config(format!(
                    "[budgets] limit for {} must be positive, got {}",
                    category, limit
                )));
            }
        }

        if self.charity_categories.is_empty() {
            return Err(Error::Config("charity_categories must not be empty".into()));
        }

        let [down, keep, up] = self.policy.action_space;
        if !(down > 0.0 && down < keep && keep < up) {
            return Err(Error::Config(format!(
                "[policy] action_space must be increasing positive multipliers, got {:?}",
                self.policy.action_space
            )));
        }
        for (name, value) in [
            ("learning_rate", self.policy.learning_rate),
            ("discount_factor", self.policy.discount_factor),
            ("nearing_limit_ratio", self.thresholds.nearing_limit_ratio),
            ("underutilized_ratio", self.thresholds.underutilized_ratio),
            ("confidence_threshold", self.thresholds.confidence_threshold),
            ("donation.rate", self.donation.rate),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(Error::Config(format!(
                    "{} must be within (0, 1], got {}",
                    name, value
                )));
            }
        }

        if self.forecast.window == 0 || self.forecast.horizon_days == 0 {
            return Err(Error::Config(
                "[forecast] window and horizon_days must be at least 1".into(),
            ));
        }
        if self.donation.clusters == 0 || self.donation.min_transactions < self.donation.clusters
        {
            return Err(Error::Config(
                "[donation] min_transactions must be at least the cluster count".into(),
            ));
        }

        Ok(())
    }

    /// Configured starting limit for a category
    pub fn initial_limit(&self, category: Category) -> f64 {
        self.lookup_limit(category).unwrap_or(0.0)
    }

    /// Whether a name is one of the configured charity categories
    pub fn is_charity_category(&self, name: &str) -> bool {
        self.charity_categories.iter().any(|c| c == name)
    }

    fn lookup_limit(&self, category: Category) -> Option<f64> {
        self.budgets
            .iter()
            .find(|(name, _)| name.parse::<Category>().ok() == Some(category))
            .map(|(_, limit)| *limit)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("budgetwise").join("config").join("budget.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_config_matches_defaults() {
        let parsed = BudgetConfig::from_toml_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(parsed, BudgetConfig::default());
    }

    #[test]
    fn test_initial_limits() {
        let config = BudgetConfig::default();
        assert_eq!(config.initial_limit(Category::Food), 500.0);
        assert_eq!(config.initial_limit(Category::Subscriptions), 50.0);
        assert!(config.is_charity_category("Poverty Alleviation"));
        assert!(!config.is_charity_category("poverty alleviation"));
    }

    #[test]
    fn test_multiplier_lookup() {
        let policy = PolicyConfig::default();
        assert_eq!(policy.multiplier(AdjustmentAction::Decrease), 0.9);
        assert_eq!(policy.multiplier(AdjustmentAction::Maintain), 1.0);
        assert_eq!(policy.multiplier(AdjustmentAction::Increase), 1.1);
    }

    #[test]
    fn test_missing_category_rejected() {
        let mut config = BudgetConfig::default();
        config.budgets.remove("Other");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("missing limit for Other"));
    }

    #[test]
    fn test_unknown_category_rejected() {
        let mut config = BudgetConfig::default();
        config.budgets.insert("Travel".into(), 10.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_positive_limit_rejected() {
        let mut config = BudgetConfig::default();
        config.budgets.insert("Food".into(), 0.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unsorted_action_space_rejected() {
        let mut config = BudgetConfig::default();
        config.policy.action_space = [1.1, 1.0, 0.9];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_optional_sections_default() {
        let toml = r#"
charity_categories = ["Health"]

[budgets]
Food = 1.0
Transportation = 1.0
Entertainment = 1.0
Utilities = 1.0
Shopping = 1.0
Subscriptions = 1.0
Healthcare = 1.0
Other = 1.0

[policy]
action_space = [0.8, 1.0, 1.25]
learning_rate = 0.5
discount_factor = 0.5
"#;
        let config = BudgetConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.thresholds, ThresholdConfig::default());
        assert_eq!(config.forecast, ForecastConfig::default());
        assert_eq!(config.policy.multiplier(AdjustmentAction::Increase), 1.25);
    }

    #[test]
    fn test_load_from_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let mut config = BudgetConfig::default();
        config.budgets.insert("Food".into(), 750.0);
        write!(file, "{}", toml::to_string(&config).unwrap()).unwrap();

        let loaded = BudgetConfig::load(Some(file.path())).unwrap();
        assert_eq!(loaded.initial_limit(Category::Food), 750.0);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let result = BudgetConfig::load(Some(Path::new("/nonexistent/budget.toml")));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
