//! Status command implementation

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, OutputFormat, StatusArgs};
use crate::commands::common::{build_migrator, load_settings};

/// Execute the status command
pub fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let settings = load_settings(global)?;
    let status = build_migrator(&settings)
        .status()
        .context("Failed to read migration status")?;

    match args.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        OutputFormat::Text => {
            println!("Database: {}", settings.database.display());
            if !status.ledger_exists {
                println!("Ledger:   not created yet");
            } else {
                println!("Version:  {}", status.current_version);
                if global.verbose {
                    let applied: Vec<String> =
                        status.applied.iter().map(|id| id.to_string()).collect();
                    println!("Applied:  {}", applied.join(", "));
                }
            }
            if status.pending.is_empty() {
                println!("Pending:  none");
            } else {
                println!("Pending:");
                for name in &status.pending {
                    println!("  {name}");
                }
            }
        }
    }
    Ok(())
}
