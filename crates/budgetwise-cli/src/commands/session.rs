//! Session loading and shared command utilities

use std::path::Path;

use anyhow::{Context, Result};
use budgetwise_core::{parse_csv_file, BudgetConfig, ClassifierClient, SharedSession};
use chrono::NaiveDate;
use tracing::{debug, info};

/// Build a fresh session from config, seeding it from a CSV history if given
pub async fn open_session(config_path: Option<&Path>, file: Option<&Path>) -> Result<SharedSession> {
    let config = BudgetConfig::load(config_path).context("Failed to load budget config")?;
    let session = SharedSession::from_config(config).context("Invalid budget config")?;

    if let Some(path) = file {
        import_history(&session, path).await?;
    }

    Ok(session)
}

/// Import a CSV history into the session, classifying rows without a category
pub async fn import_history(session: &SharedSession, path: &Path) -> Result<()> {
    let rows = parse_csv_file(path)
        .with_context(|| format!("Failed to read transactions from {}", path.display()))?;
    debug!(rows = rows.len(), "Parsed history file");

    // Only reach for the classifier when some row needs it
    let classifier = if rows.iter().any(|row| row.category.is_none()) {
        Some(classifier_from_env()?)
    } else {
        None
    };

    let summary = session
        .import(rows, classifier.as_ref())
        .await
        .context("Failed to import transactions")?;
    info!(recorded = summary.recorded, "Imported history");

    println!(
        "📥 Loaded {} transactions from {}",
        summary.recorded,
        path.display()
    );
    if !summary.uncertain.is_empty() {
        println!(
            "   ⚠️  Skipped {} with an uncertain category:",
            summary.uncertain.len()
        );
        for pending in &summary.uncertain {
            println!(
                "      {} {:<30} ${:>9.2}  (maybe {}, {:.0}%)",
                pending.date,
                truncate(&pending.description, 30),
                pending.amount,
                pending.suggested_category,
                pending.confidence * 100.0
            );
        }
        println!("   💡 Tip: Add them with `budgetwise confirm --category <CATEGORY>`");
    }

    Ok(())
}

/// Classifier backend from the environment
pub fn classifier_from_env() -> Result<ClassifierClient> {
    ClassifierClient::from_env().ok_or_else(|| {
        anyhow::anyhow!("Classifier not configured. Set OLLAMA_HOST or CLASSIFIER_BACKEND=mock.")
    })
}

/// Date argument, defaulting to today
pub fn date_or_today(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| chrono::Local::now().date_naive())
}

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
