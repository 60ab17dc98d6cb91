//! Budgetwise CLI - Adaptive budget recommendations
//!
//! Usage:
//!   budgetwise --file history.csv budgets     Show budgets after loading history
//!   budgetwise --file history.csv advise      Suggest a budget adjustment
//!   budgetwise categorize -d "Uber" -a 23     Classify and record an expense
//!   budgetwise --file history.csv forecast    Forecast daily spending
//!   budgetwise donation suggest               Suggest a donation amount
//!
//! Each invocation starts from the configured budgets and replays `--file`.

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    // Classify never touches the ledger
    if let Commands::Classify { text } = &cli.command {
        let classifier = commands::classifier_from_env()?;
        return commands::cmd_classify(&classifier, text).await;
    }

    let session = commands::open_session(cli.config.as_deref(), cli.file.as_deref()).await?;

    match cli.command {
        Commands::Budgets => commands::cmd_budgets(&session),
        Commands::Categorize {
            description,
            amount,
            date,
        } => {
            let classifier = commands::classifier_from_env()?;
            commands::cmd_categorize(
                &session,
                &classifier,
                &description,
                amount,
                commands::date_or_today(date),
            )
            .await
        }
        Commands::Confirm {
            description,
            amount,
            category,
            date,
        } => commands::cmd_confirm(
            &session,
            &description,
            amount,
            category,
            commands::date_or_today(date),
        ),
        Commands::Advise => commands::cmd_advise(&session),
        Commands::Apply { category, action } => commands::cmd_apply(&session, category, action),
        Commands::Forecast => commands::cmd_forecast(&session),
        Commands::Donation { action } => match action {
            DonationAction::Suggest => commands::cmd_donation_suggest(&session),
            DonationAction::Record {
                amount,
                charity,
                from,
                date,
            } => commands::cmd_donation_record(
                &session,
                amount,
                &charity,
                from.as_deref(),
                commands::date_or_today(date),
            ),
        },
        Commands::Export { output } => commands::cmd_export(&session, output.as_deref()),
        Commands::Classify { .. } => Ok(()),
    }
}
