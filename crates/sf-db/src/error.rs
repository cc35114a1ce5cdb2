//! Error types for the migration engine.

use sf_core::CoreError;
use thiserror::Error;

/// Migration engine errors.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Failed to open or create the target database (M001).
    #[error("[M001] Database connection failed: {0}")]
    ConnectionFailure(String),

    /// Reading or writing the `__migrations` ledger failed (M002).
    #[error("[M002] Migration ledger error: {0}")]
    LedgerError(String),

    /// A migration script could not be parsed (M003).
    #[error("[M003] Invalid migration `{name}`: {source}")]
    InvalidMigration {
        name: String,
        #[source]
        source: CoreError,
    },

    /// The migration source failed to list or return a script (M004).
    #[error("[M004] Migration source failed: {0}")]
    SourceError(#[source] CoreError),

    /// A migration's statements and ledger insert did not commit (M005).
    #[error("[M005] Migration `{name}` (id {id}) failed: {message}")]
    ApplyFailure {
        name: String,
        id: i64,
        message: String,
    },

    /// Transaction management error (M006).
    #[error("[M006] Transaction failed: {0}")]
    TransactionError(String),

    /// DuckDB driver error with preserved source chain (M007).
    #[error("[M007] DuckDB error")]
    DuckDb(#[source] duckdb::Error),
}

/// Result type alias for [`MigrateError`].
pub type MigrateResult<T> = Result<T, MigrateError>;

impl From<duckdb::Error> for MigrateError {
    fn from(err: duckdb::Error) -> Self {
        MigrateError::DuckDb(err)
    }
}
