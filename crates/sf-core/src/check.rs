//! Static SQL check of a migration's apply script.
//!
//! The engine never runs this; it backs `sf check` so broken scripts (for
//! instance ones truncated at a hyphen inside a string literal) surface
//! before a migration pass does.

use crate::error::{CoreError, CoreResult};
use sqlparser::dialect::DuckDbDialect;
use sqlparser::parser::Parser;

/// Parse `script` with the DuckDB dialect and return its statement count.
pub fn check_apply_script(script: &str) -> CoreResult<usize> {
    let script = script.trim();
    if script.is_empty() {
        return Err(CoreError::SqlCheckFailed {
            message: "script is empty".to_string(),
        });
    }
    let statements =
        Parser::parse_sql(&DuckDbDialect {}, script).map_err(|e| CoreError::SqlCheckFailed {
            message: e.to_string(),
        })?;
    Ok(statements.len())
}
