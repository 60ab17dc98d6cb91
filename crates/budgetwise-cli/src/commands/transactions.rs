//! Transaction commands (categorize, confirm, classify)

use anyhow::{Context, Result};
use budgetwise_core::{CategorizeOutcome, Category, SharedSession, TextClassifier};
use chrono::NaiveDate;

use super::truncate;

pub async fn cmd_categorize<C: TextClassifier + ?Sized>(
    session: &SharedSession,
    classifier: &C,
    description: &str,
    amount: f64,
    date: NaiveDate,
) -> Result<()> {
    let outcome = session
        .categorize(classifier, date, description, amount)
        .await
        .context("Failed to categorize transaction")?;

    match outcome {
        CategorizeOutcome::Recorded { transaction } => {
            println!(
                "✅ Recorded ${:.2} \"{}\" as {} ({:.0}% confident)",
                transaction.amount,
                truncate(&transaction.description, 40),
                transaction.category,
                transaction.confidence * 100.0
            );
        }
        CategorizeOutcome::Uncertain(pending) => {
            println!(
                "🤔 Not sure about \"{}\": best guess {} ({:.0}%)",
                truncate(&pending.description, 40),
                pending.suggested_category,
                pending.confidence * 100.0
            );
            println!("   Nothing was recorded. Pick one of:");
            println!("      {}", pending.categories.join(", "));
            println!(
                "   💡 Tip: budgetwise confirm --description \"{}\" --amount {} --date {} --category <CATEGORY>",
                pending.description, pending.amount, pending.date
            );
        }
    }

    Ok(())
}

pub fn cmd_confirm(
    session: &SharedSession,
    description: &str,
    amount: f64,
    category: Category,
    date: NaiveDate,
) -> Result<()> {
    let tx = session
        .confirm_category(date, description, amount, category)
        .context("Failed to record transaction")?;

    let remaining = session
        .get_budgets()?
        .get(category.index())
        .map(|line| line.remaining)
        .unwrap_or_default();

    println!(
        "✅ Recorded ${:.2} \"{}\" as {}",
        tx.amount,
        truncate(&tx.description, 40),
        category
    );
    println!("   {} remaining: ${:.2}", category, remaining);

    Ok(())
}

pub async fn cmd_classify<C: TextClassifier + ?Sized>(classifier: &C, text: &str) -> Result<()> {
    println!("🔍 Classifying with {}...", classifier.model());

    let labels = Category::labels();
    let classification = classifier
        .classify(text, &labels)
        .await
        .context("Classifier request failed")?;

    println!();
    println!("   \"{}\"", truncate(text, 60));
    for (label, score) in classification.labels.iter().zip(&classification.scores) {
        let bar = "█".repeat((score * 30.0).round() as usize);
        println!("   {:<15} {:>5.1}%  {}", label, score * 100.0, bar);
    }

    Ok(())
}
