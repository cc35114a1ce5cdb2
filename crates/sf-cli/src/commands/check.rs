//! Check command implementation

use anyhow::{bail, Context, Result};
use sf_core::check::check_apply_script;
use sf_core::{name_prefix, parse_migration, select_pending, DirectorySource, MigrationSource};

use crate::cli::{CheckArgs, GlobalArgs};
use crate::commands::common::{load_settings, require_migrations_dir};

/// Result of checking one migration file
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum CheckOutcome {
    /// Parsed (and SQL-checked unless disabled); carries id and statement count
    Ok { id: i64, statements: Option<usize> },
    /// Parsed, but the header id differs from the file name prefix
    IdMismatch { id: i64, prefix: i64 },
    /// Could not be parsed or checked
    Failed(String),
}

/// Parse and check a single migration's raw text.
pub(crate) fn check_migration(name: &str, raw: &str, check_sql: bool) -> CheckOutcome {
    let migration = match parse_migration(raw) {
        Ok(m) => m,
        Err(e) => return CheckOutcome::Failed(e.to_string()),
    };
    let id = migration.id.get();

    let statements = if check_sql {
        match check_apply_script(&migration.up_script()) {
            Ok(count) => Some(count),
            Err(e) => return CheckOutcome::Failed(e.to_string()),
        }
    } else {
        None
    };

    match name_prefix(name) {
        Some(prefix) if prefix != id => CheckOutcome::IdMismatch { id, prefix },
        _ => CheckOutcome::Ok { id, statements },
    }
}

/// Execute the check command
pub fn execute(args: &CheckArgs, global: &GlobalArgs) -> Result<()> {
    let settings = load_settings(global)?;
    let dir = require_migrations_dir(&settings)?;
    let source = DirectorySource::new(dir);

    let names = source
        .names()
        .with_context(|| format!("Failed to list migrations in {}", dir.display()))?;
    let candidates = select_pending(&names, 0);
    if global.verbose {
        for name in names.iter().filter(|n| !candidates.contains(n)) {
            println!("  Skipping (not a migration name): {name}");
        }
    }

    let mut failures = 0;
    for name in &candidates {
        let raw = source
            .migration(name)
            .with_context(|| format!("Failed to read {name}"))?;
        match check_migration(name, &raw, !args.no_sql) {
            CheckOutcome::Ok { id, statements } => match statements {
                Some(count) => println!("  ok    {name} (id {id}, {count} statement(s))"),
                None => println!("  ok    {name} (id {id})"),
            },
            CheckOutcome::IdMismatch { id, prefix } => {
                log::warn!("{name}: header id {id} differs from file name prefix {prefix}");
                println!("  warn  {name} (id {id}, file prefix {prefix})");
            }
            CheckOutcome::Failed(message) => {
                failures += 1;
                println!("  FAIL  {name}: {message}");
            }
        }
    }

    println!();
    println!("Checked {} migration(s)", candidates.len());
    if failures > 0 {
        bail!("{failures} migration(s) failed the check");
    }
    Ok(())
}
