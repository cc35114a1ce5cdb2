//! The applied-migration ledger.
//!
//! `__migrations` holds one `id` row per applied migration plus a sentinel
//! row `0` written when the table is created. Rows are only ever appended;
//! the current version is the highest id present.

use crate::error::{MigrateError, MigrateResult};
use duckdb::Connection;
use sf_core::MigrationId;

/// Name of the ledger table, in the `main` schema
pub const LEDGER_TABLE: &str = "__migrations";

/// State tracker over an open connection.
pub struct Ledger<'a> {
    conn: &'a Connection,
}

impl<'a> Ledger<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// True iff the ledger table is present in the catalog.
    pub fn exists(&self) -> MigrateResult<bool> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM information_schema.tables \
                 WHERE table_schema = 'main' AND table_name = ?",
                duckdb::params![LEDGER_TABLE],
                |row| row.get(0),
            )
            .map_err(|e| MigrateError::LedgerError(format!("failed to probe ledger table: {e}")))?;
        Ok(count > 0)
    }

    /// Create the ledger table and its sentinel row.
    ///
    /// Only called after [`Ledger::exists`] returned false; there is no
    /// `IF NOT EXISTS` guard.
    pub fn create(&self) -> MigrateResult<()> {
        log::debug!("Creating migration ledger {LEDGER_TABLE}");
        self.conn
            .execute_batch(&format!(
                "CREATE TABLE {LEDGER_TABLE} ( id BIGINT NOT NULL )"
            ))
            .map_err(|e| MigrateError::LedgerError(format!("failed to create ledger: {e}")))?;
        self.append(0)
    }

    /// Create the ledger unless it already exists. Returns true if created.
    pub fn ensure(&self) -> MigrateResult<bool> {
        if self.exists()? {
            return Ok(false);
        }
        self.create()?;
        Ok(true)
    }

    /// Highest identifier in the ledger, `0` when only the sentinel exists.
    pub fn current_version(&self) -> MigrateResult<i64> {
        self.conn
            .query_row(
                &format!("SELECT COALESCE(MAX(id), 0) FROM {LEDGER_TABLE}"),
                [],
                |row| row.get(0),
            )
            .map_err(|e| MigrateError::LedgerError(format!("failed to read current version: {e}")))
    }

    /// Append one row for an applied migration.
    ///
    /// No uniqueness is enforced here; the scheduler never re-offers an
    /// applied identifier.
    pub fn record_applied(&self, id: MigrationId) -> MigrateResult<()> {
        self.append(id.get())
    }

    /// Every ledger row, sentinel included, in the order it was written.
    pub fn applied_ids(&self) -> MigrateResult<Vec<i64>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT id FROM {LEDGER_TABLE} ORDER BY rowid"))
            .map_err(|e| MigrateError::LedgerError(format!("failed to list ledger: {e}")))?;
        let ids = stmt
            .query_map([], |row| row.get::<_, i64>(0))
            .map_err(|e| MigrateError::LedgerError(format!("failed to list ledger: {e}")))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| MigrateError::LedgerError(format!("ledger row error: {e}")))?;
        Ok(ids)
    }

    fn append(&self, id: i64) -> MigrateResult<()> {
        self.conn
            .execute(
                &format!("INSERT INTO {LEDGER_TABLE} ( id ) VALUES ( ? )"),
                duckdb::params![id],
            )
            .map_err(|e| MigrateError::LedgerError(format!("failed to record id {id}: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
