//! Donation commands (suggest, record)

use anyhow::{Context, Result};
use budgetwise_core::{DonationOutcome, DonationRequest, SharedSession};
use chrono::NaiveDate;

pub fn cmd_donation_suggest(session: &SharedSession) -> Result<()> {
    let outcome = session
        .suggest_donation()
        .context("Failed to compute a donation suggestion")?;

    println!();
    match outcome {
        DonationOutcome::NotEnoughData { message, .. } => {
            println!("⚠️  {}", message);
        }
        DonationOutcome::Success(s) => {
            println!("💝 {}", s.message);
            println!(
                "   Typical purchases: small ${:.2}, medium ${:.2}, large ${:.2}",
                s.tiers.small, s.tiers.medium, s.tiers.large
            );
            println!(
                "   Fund it from {} (least used budget)",
                s.suggested_reallocation
            );
            println!("   Causes: {}", s.suggested_categories.join(", "));
            println!();
            println!(
                "   💡 Tip: budgetwise donation record --amount {:.2} --charity <CAUSE> --from {}",
                s.suggested_amount, s.suggested_reallocation
            );
        }
    }
    println!();

    Ok(())
}

pub fn cmd_donation_record(
    session: &SharedSession,
    amount: f64,
    charity: &str,
    from: Option<&str>,
    date: NaiveDate,
) -> Result<()> {
    let tx = session
        .record_donation(DonationRequest {
            date,
            amount,
            charity_category: charity.to_string(),
            reallocation_category: from.map(str::to_string),
        })
        .context("Failed to record donation")?;

    println!("💝 Recorded ${:.2} donation to {}", amount, charity);
    if let Some(category) = tx.reallocation_category {
        let remaining = session
            .get_budgets()?
            .get(category.index())
            .map(|line| line.remaining)
            .unwrap_or_default();
        println!("   Funded from {}: ${:.2} remaining", category, remaining);
    }

    Ok(())
}
