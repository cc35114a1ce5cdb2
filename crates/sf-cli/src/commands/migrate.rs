//! Migrate command implementation

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, MigrateArgs};
use crate::commands::common::{build_migrator, load_settings};

/// Execute the migrate command
pub fn execute(args: &MigrateArgs, global: &GlobalArgs) -> Result<()> {
    let settings = load_settings(global)?;
    let migrator = build_migrator(&settings);

    if settings.migrations.is_none() {
        log::warn!("No migrations directory configured; only the database file is created");
    }

    if args.dry_run {
        let status = migrator
            .status()
            .context("Failed to read migration status")?;
        if status.pending.is_empty() {
            println!("Nothing to migrate (version {})", status.current_version);
            return Ok(());
        }
        println!("Dry run - would apply the following migrations:");
        for name in &status.pending {
            println!("  {name}");
        }
        return Ok(());
    }

    let report = migrator
        .try_initialize()
        .with_context(|| format!("Migration of {} failed", settings.database.display()))?;

    if report.ledger_created {
        println!("Created migration ledger");
    }
    if report.applied.is_empty() {
        println!("Nothing to migrate (version {})", report.previous_version);
    } else {
        for id in &report.applied {
            println!("  Applied {id}");
        }
        println!(
            "Migrated {} -> {} ({} migration(s))",
            report.previous_version,
            report.current_version(),
            report.applied.len()
        );
    }
    Ok(())
}
