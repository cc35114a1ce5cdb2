//! sf-core - Core library for Schemaflow
//!
//! This crate provides the migration script parser, the pending-migration
//! scheduler, the migration source and log sink abstractions, and project
//! configuration parsing shared by the engine and the CLI.

pub mod check;
pub mod config;
pub mod error;
pub mod logger;
pub mod migration;
pub mod schedule;
pub mod source;

pub use config::Config;
pub use error::{CoreError, CoreResult};
pub use logger::{LogCrateLogger, MemoryLogger, MigrationLogger};
pub use migration::{parse_migration, Migration, MigrationId};
pub use schedule::{name_prefix, select_pending};
pub use source::{DirectorySource, EmbeddedSource, MemorySource, MigrationSource};
