//! Forecast command

use anyhow::{Context, Result};
use budgetwise_core::{ForecastMethod, ForecastOutcome, SharedSession};

pub fn cmd_forecast(session: &SharedSession) -> Result<()> {
    let outcome = session.forecast().context("Forecast failed")?;

    println!();
    match outcome {
        ForecastOutcome::NotEnoughData {
            transaction_count,
            required,
            message,
        } => {
            println!("⚠️  {}", message);
            println!(
                "   Have {} transactions, need {}.",
                transaction_count, required
            );
        }
        ForecastOutcome::Success(forecast) => {
            let method = match forecast.method {
                ForecastMethod::SameDay => "same-day average",
                ForecastMethod::SequenceModel => "daily trend",
            };
            println!("🔮 Spending forecast ({})", method);
            for point in &forecast.points {
                println!("   {}  ${:>9.2}", point.date, point.amount);
            }
            let total: f64 = forecast.points.iter().map(|p| p.amount).sum();
            println!("   ─────────────────────");
            println!("   Total       ${:>9.2}", total);
            if let Some(message) = &forecast.message {
                println!("   💡 {}", message);
            }
        }
    }
    println!();

    Ok(())
}
