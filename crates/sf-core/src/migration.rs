//! Migration script parsing.
//!
//! A migration script is line oriented:
//!
//! ```text
//! --- database id 201704080412
//! --- database up
//! CREATE TABLE people (id INT NOT NULL); -- inline comment
//! --- database down
//! DROP TABLE people;
//! ```
//!
//! Every non-marker line is cut at its first `-` before being trimmed, which
//! strips `-- comment` suffixes. The cut is literal: a hyphen inside a quoted
//! string (`'a-b'`) truncates the line there too.

use crate::error::{CoreError, CoreResult};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

static ID_HEADER_RE: OnceLock<Regex> = OnceLock::new();
static UP_MARKER_RE: OnceLock<Regex> = OnceLock::new();
static DOWN_MARKER_RE: OnceLock<Regex> = OnceLock::new();

fn id_header_regex() -> &'static Regex {
    ID_HEADER_RE.get_or_init(|| Regex::new(r"--- database id (\d+)").expect("valid regex"))
}

fn up_marker_regex() -> &'static Regex {
    UP_MARKER_RE.get_or_init(|| Regex::new(r"--- database up").expect("valid regex"))
}

fn down_marker_regex() -> &'static Regex {
    DOWN_MARKER_RE.get_or_init(|| Regex::new(r"--- database down").expect("valid regex"))
}

/// Identifier a migration declares in its own `--- database id` header.
///
/// Always strictly positive; `0` is reserved for the ledger sentinel row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MigrationId(i64);

impl MigrationId {
    /// Wrap a raw identifier, returning `None` unless it is positive.
    pub fn new(id: i64) -> Option<Self> {
        (id > 0).then_some(Self(id))
    }

    /// The raw identifier as stored in the ledger.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for MigrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Section of the script a line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Up,
    Down,
}

/// A parsed migration script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    /// Identifier recorded in the ledger once the migration is applied
    pub id: MigrationId,
    /// Apply statements, one entry per source line, in order
    pub up: Vec<String>,
    /// Revert statements, one entry per source line, in order.
    ///
    /// Parsed and preserved, never executed by the engine.
    pub down: Vec<String>,
}

impl Migration {
    /// Parse raw migration text. See [`parse_migration`].
    pub fn parse(raw: &str) -> CoreResult<Self> {
        parse_migration(raw)
    }

    /// The apply section joined into one executable script.
    pub fn up_script(&self) -> String {
        join_statements(&self.up)
    }

    /// The revert section joined the same way as [`Migration::up_script`].
    pub fn down_script(&self) -> String {
        join_statements(&self.down)
    }
}

fn join_statements(lines: &[String]) -> String {
    lines.join(" ").trim().to_string()
}

/// Strip everything from the first `-` onwards, then surrounding whitespace.
fn strip_line(line: &str) -> &str {
    line.find('-').map_or(line, |pos| &line[..pos]).trim()
}

/// Parse one migration's raw text into a [`Migration`].
///
/// Fails with [`CoreError::MissingIdentifier`] when no positive id header is
/// present, and with [`CoreError::EmptyMigration`] when the joined apply
/// section is empty. When several id headers appear, the last one wins.
pub fn parse_migration(raw: &str) -> CoreResult<Migration> {
    let mut id: i64 = 0;
    let mut section = Section::None;
    let mut up = Vec::new();
    let mut down = Vec::new();

    for line in raw.split('\n') {
        if let Some(caps) = id_header_regex().captures(line) {
            let digits = &caps[1];
            id = digits
                .parse::<i64>()
                .map_err(|e| CoreError::MalformedMigration {
                    message: format!("invalid id '{digits}': {e}"),
                })?;
            continue;
        }
        if up_marker_regex().is_match(line) {
            section = Section::Up;
            continue;
        }
        if down_marker_regex().is_match(line) {
            section = Section::Down;
            continue;
        }

        let sql = strip_line(line);
        match section {
            Section::Up => up.push(sql.to_string()),
            Section::Down => down.push(sql.to_string()),
            Section::None => {}
        }
    }

    let id = MigrationId::new(id).ok_or(CoreError::MissingIdentifier)?;

    let migration = Migration { id, up, down };
    if migration.up_script().is_empty() {
        return Err(CoreError::EmptyMigration { id: id.get() });
    }
    Ok(migration)
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;
