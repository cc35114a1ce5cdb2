//! sf-db - Migration engine for Schemaflow
//!
//! Applies versioned SQL scripts to a DuckDB database exactly once each.
//! Applied identifiers are tracked in the `__migrations` ledger table inside
//! the target database itself, so the current version is re-derived on every
//! run.

pub mod connection;
pub mod error;
pub mod ledger;
pub mod migrator;

pub use connection::{open_database, with_transaction};
pub use error::{MigrateError, MigrateResult};
pub use ledger::{Ledger, LEDGER_TABLE};
pub use migrator::{MigrationReport, MigrationStatus, Migrator, MigratorConfig};
