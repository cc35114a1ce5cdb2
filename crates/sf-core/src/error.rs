//! Error types for sf-core

use thiserror::Error;

/// Core error type for Schemaflow
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Migration text has no `--- database id` header (or declares id 0)
    #[error("[E001] No id defined for the migration")]
    MissingIdentifier,

    /// E002: Migration has no apply statements
    #[error("[E002] Empty migration: id {id} has no statements in its up section")]
    EmptyMigration { id: i64 },

    /// E003: Migration text could not be interpreted
    #[error("[E003] Malformed migration: {message}")]
    MalformedMigration { message: String },

    /// E004: Source has no migration with this name
    #[error("[E004] Migration not found: {name}")]
    MigrationNotFound { name: String },

    /// E005: Configuration file not found
    #[error("[E005] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E006: Failed to parse configuration file
    #[error("[E006] Failed to parse config: {0}")]
    ConfigParseError(#[from] serde_yaml::Error),

    /// E007: Invalid configuration value
    #[error("[E007] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E008: IO error with file path context
    #[error("[E008] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E009: Apply script is not valid SQL
    #[error("[E009] SQL check failed: {message}")]
    SqlCheckFailed { message: String },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
