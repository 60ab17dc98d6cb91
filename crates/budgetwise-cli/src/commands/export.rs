//! Export command

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use budgetwise_core::SharedSession;

pub fn cmd_export(session: &SharedSession, output: Option<&Path>) -> Result<()> {
    let snapshot = session.snapshot().context("Failed to read session state")?;
    let json = serde_json::to_string_pretty(&snapshot)?;

    match output {
        Some(path) => {
            let mut file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            writeln!(file, "{}", json)?;
            println!(
                "✅ Exported {} transactions to {}",
                snapshot.transactions.len(),
                path.display()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}
