//! Budget commands (budgets, advise, apply)

use anyhow::{Context, Result};
use budgetwise_core::{
    AdjustmentAction, AdjustmentOutcome, Category, SharedSession, UtilizationStatus,
};

pub fn cmd_budgets(session: &SharedSession) -> Result<()> {
    let analysis = session.utilization().context("Failed to analyze budgets")?;

    println!();
    println!("📊 Budgets");
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {:<15} {:>10} {:>10} {:>10} {:>6}  Status",
        "Category", "Limit", "Spent", "Remaining", "Used"
    );
    for u in &analysis {
        let marker = match u.status {
            UtilizationStatus::Overspent => "🔴",
            UtilizationStatus::NearingLimit => "🟠",
            UtilizationStatus::Underutilized => "🔵",
            UtilizationStatus::Healthy => "🟢",
        };
        println!(
            "   {:<15} {:>10.2} {:>10.2} {:>10.2} {:>5.0}%  {} {}",
            u.category.as_str(),
            u.current_budget,
            u.spent,
            u.remaining,
            u.spending_ratio * 100.0,
            marker,
            u.status.as_str()
        );
    }

    let total_limit: f64 = analysis.iter().map(|u| u.current_budget).sum();
    let total_spent: f64 = analysis.iter().map(|u| u.spent).sum();
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {:<15} {:>10.2} {:>10.2} {:>10.2}",
        "Total",
        total_limit,
        total_spent,
        total_limit - total_spent
    );
    println!();

    Ok(())
}

pub fn cmd_advise(session: &SharedSession) -> Result<()> {
    let outcome = session
        .suggest_adjustment()
        .context("Failed to compute a suggestion")?;

    println!();
    match outcome {
        AdjustmentOutcome::NoAdjustmentNeeded { message } => {
            println!("✅ {}", message);
        }
        AdjustmentOutcome::AdjustmentNeeded(s) => {
            println!("💡 Suggested adjustment for {}", s.category);
            println!("   {}", s.details);
            println!(
                "   Budget: ${:.2} → ${:.2} ({} ×{:.2})",
                s.current_budget, s.suggested_budget, s.action, s.chosen_multiplier
            );
            println!(
                "   Spent ${:.2}, ${:.2} remaining",
                s.spent, s.remaining
            );
            println!(
                "   Learned values: decrease {:.3}, maintain {:.3}, increase {:.3}",
                s.learned_values[0], s.learned_values[1], s.learned_values[2]
            );
            println!();
            println!(
                "   💡 Tip: Run `budgetwise apply --category {} --action {}` to accept",
                s.category, s.action
            );
        }
    }
    println!();

    Ok(())
}

pub fn cmd_apply(session: &SharedSession, category: Category, action: AdjustmentAction) -> Result<()> {
    let applied = session
        .apply_adjustment(category, action)
        .with_context(|| format!("Failed to apply {} to {}", action, category))?;

    println!(
        "✅ {} budget set to ${:.2} ({})",
        applied.category, applied.new_budget, applied.action
    );
    println!("   Remaining: ${:.2}", applied.remaining);
    println!(
        "   Reward {:+.1}, learned value now {:.3}",
        applied.reward, applied.q_value
    );

    Ok(())
}
