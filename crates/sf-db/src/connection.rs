//! Opening the target database and running transactions against it.

use crate::error::{MigrateError, MigrateResult};
use duckdb::Connection;
use std::path::Path;

/// Location that selects an in-memory database instead of a file
pub const IN_MEMORY: &str = ":memory:";

/// Open (or create) the DuckDB database at `path`.
///
/// The file is created on open when it does not exist yet; its parent
/// directory must exist.
pub fn open_database(path: &Path) -> MigrateResult<Connection> {
    if path.as_os_str() == IN_MEMORY {
        return Connection::open_in_memory()
            .map_err(|e| MigrateError::ConnectionFailure(e.to_string()));
    }
    Connection::open(path)
        .map_err(|e| MigrateError::ConnectionFailure(format!("{e}: {}", path.display())))
}

/// Execute `body` within a `BEGIN` / `COMMIT` transaction, rolling back on
/// error.
pub fn with_transaction<F, T>(conn: &Connection, body: F) -> MigrateResult<T>
where
    F: FnOnce(&Connection) -> MigrateResult<T>,
{
    conn.execute_batch("BEGIN TRANSACTION")
        .map_err(|e| MigrateError::TransactionError(format!("BEGIN failed: {e}")))?;

    let result = body(conn);

    match &result {
        Ok(_) => {
            if let Err(commit_err) = conn.execute_batch("COMMIT") {
                let _ = conn.execute_batch("ROLLBACK");
                return Err(MigrateError::TransactionError(format!(
                    "COMMIT failed: {commit_err}"
                )));
            }
        }
        Err(_) => {
            if let Err(rollback_err) = conn.execute_batch("ROLLBACK") {
                log::warn!("ROLLBACK failed: {rollback_err}");
            }
        }
    }
    result
}

#[cfg(test)]
#[path = "connection_test.rs"]
mod tests;
