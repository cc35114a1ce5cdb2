//! Migration engine.
//!
//! [`Migrator::initialize`] opens (creating if needed) the target database
//! and, when a source is configured, applies every pending migration in
//! scheduler order. Each migration's apply script and its ledger row commit
//! in a single transaction; the first failure ends the pass.
//!
//! `initialize` never returns an error. Failures are reported to the
//! configured [`MigrationLogger`] and otherwise dropped, so a caller that
//! needs certainty must check [`Migrator::status`] afterwards or use
//! [`Migrator::try_initialize`].

use crate::connection::{open_database, with_transaction};
use crate::error::{MigrateError, MigrateResult};
use crate::ledger::{Ledger, LEDGER_TABLE};
use duckdb::Connection;
use serde::Serialize;
use sf_core::{parse_migration, select_pending, Migration, MigrationLogger, MigrationSource};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

/// Prefix of every message sent to the log sink
const LOG_TAG: &str = module_path!();

/// Immutable input of one [`Migrator`].
#[derive(Clone)]
pub struct MigratorConfig {
    db_path: PathBuf,
    source: Option<Arc<dyn MigrationSource>>,
    logger: Option<Arc<dyn MigrationLogger>>,
}

impl MigratorConfig {
    /// Configuration that only opens (and creates) the database at `db_path`.
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            source: None,
            logger: None,
        }
    }

    /// Migrations to apply. Without a source no migration pass runs.
    pub fn with_source(mut self, source: Arc<dyn MigrationSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Sink for progress and failure messages.
    pub fn with_logger(mut self, logger: Arc<dyn MigrationLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }
}

/// Outcome of one successful migration pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// The ledger table was created during this pass
    pub ledger_created: bool,
    /// Ledger version before the pass started
    pub previous_version: i64,
    /// Identifiers applied by this pass, in application order
    pub applied: Vec<i64>,
}

impl MigrationReport {
    /// Ledger version once the pass finished
    pub fn current_version(&self) -> i64 {
        self.applied
            .iter()
            .copied()
            .fold(self.previous_version, i64::max)
    }
}

/// Snapshot of the ledger and what a pass would apply next.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationStatus {
    pub ledger_exists: bool,
    pub current_version: i64,
    /// Ledger rows in the order they were written, sentinel included
    pub applied: Vec<i64>,
    /// Names the next pass would run, in order
    pub pending: Vec<String>,
}

/// Applies migrations from a [`MigrationSource`] to one database.
pub struct Migrator {
    config: MigratorConfig,
    // Serializes passes on this instance only; other processes are not covered.
    guard: Mutex<()>,
}

impl Migrator {
    pub fn new(config: MigratorConfig) -> Self {
        Self {
            config,
            guard: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &MigratorConfig {
        &self.config
    }

    /// Open the database and run one migration pass, swallowing any failure.
    ///
    /// Errors are written to the log sink when one is configured. The
    /// database may be left partially migrated.
    pub fn initialize(&self) {
        if let Err(e) = self.try_initialize() {
            self.trace(&format!("Unable to initialize the database. Reason: `{e}`"));
        }
    }

    /// Same as [`Migrator::initialize`] but returns the outcome.
    pub fn try_initialize(&self) -> MigrateResult<MigrationReport> {
        let _guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner);

        let conn = open_database(&self.config.db_path)?;
        match self.config.source.as_deref() {
            Some(source) => self.run_migrations(&conn, source),
            None => Ok(MigrationReport::default()),
        }
    }

    /// Inspect the ledger without creating it or applying anything.
    ///
    /// Opening still creates an empty database file if none exists.
    pub fn status(&self) -> MigrateResult<MigrationStatus> {
        let _guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner);

        let conn = open_database(&self.config.db_path)?;
        let ledger = Ledger::new(&conn);
        let ledger_exists = ledger.exists()?;
        let (current_version, applied) = if ledger_exists {
            (ledger.current_version()?, ledger.applied_ids()?)
        } else {
            (0, Vec::new())
        };
        let pending = match self.config.source.as_deref() {
            Some(source) => {
                let names = source.names().map_err(MigrateError::SourceError)?;
                select_pending(names, current_version)
            }
            None => Vec::new(),
        };

        Ok(MigrationStatus {
            ledger_exists,
            current_version,
            applied,
            pending,
        })
    }

    fn run_migrations(
        &self,
        conn: &Connection,
        source: &dyn MigrationSource,
    ) -> MigrateResult<MigrationReport> {
        let ledger = Ledger::new(conn);
        let ledger_created = ledger.ensure()?;
        let current = ledger.current_version()?;

        let names = source.names().map_err(MigrateError::SourceError)?;
        let pending = select_pending(names, current);
        log::debug!(
            "Ledger at version {current}, {} migration(s) pending",
            pending.len()
        );

        let mut applied = Vec::with_capacity(pending.len());
        for name in &pending {
            self.trace(&format!("Running migration `{name}`"));

            let raw = source
                .migration(name)
                .map_err(MigrateError::SourceError)?;
            let migration =
                parse_migration(&raw).map_err(|source| MigrateError::InvalidMigration {
                    name: name.clone(),
                    source,
                })?;
            self.apply(conn, name, &migration)?;
            applied.push(migration.id.get());
        }

        Ok(MigrationReport {
            ledger_created,
            previous_version: current,
            applied,
        })
    }

    /// Run the apply script and record the id as one transaction.
    fn apply(&self, conn: &Connection, name: &str, migration: &Migration) -> MigrateResult<()> {
        let id = migration.id.get();
        let failure = |message: String| MigrateError::ApplyFailure {
            name: name.to_string(),
            id,
            message,
        };
        let script = migration.up_script();
        let record_sql = format!("INSERT INTO {LEDGER_TABLE} ( id ) VALUES ( {id} )");

        log::debug!("Applying migration {name} (id {id})");
        with_transaction(conn, |conn| {
            self.profiled(&script, || conn.execute_batch(&script))
                .map_err(|e| failure(e.to_string()))?;
            self.profiled(&record_sql, || Ledger::new(conn).record_applied(migration.id))
                .map_err(|e| failure(e.to_string()))?;
            Ok(())
        })
        .map_err(|e| match e {
            e @ MigrateError::ApplyFailure { .. } => e,
            other => failure(other.to_string()),
        })
    }

    /// Run one statement and report how long it took to the log sink.
    fn profiled<T, E>(&self, sql: &str, run: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
        let started = Instant::now();
        let result = run();
        self.trace(&format!("TIME: {:?} - SQL: {sql}", started.elapsed()));
        result
    }

    fn trace(&self, message: &str) {
        if let Some(logger) = &self.config.logger {
            logger.log(&format!("[{LOG_TAG}]: {message}"));
        }
    }
}

#[cfg(test)]
#[path = "migrator_test.rs"]
mod tests;
