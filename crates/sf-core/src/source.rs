//! Migration sources.
//!
//! A [`MigrationSource`] lists migration names and returns the raw text for
//! a name. The engine treats both calls as synchronous and side-effect free.

use crate::error::{CoreError, CoreResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Supplier of migration scripts.
pub trait MigrationSource: Send + Sync {
    /// Every migration name the source knows about, in no particular order.
    fn names(&self) -> CoreResult<Vec<String>>;

    /// Raw script text for `name`.
    fn migration(&self, name: &str) -> CoreResult<String>;
}

/// In-memory name to script map.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    migrations: HashMap<String, String>,
}

impl MemorySource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, sql: impl Into<String>) -> Self {
        self.insert(name, sql);
        self
    }

    /// Add or replace a migration
    pub fn insert(&mut self, name: impl Into<String>, sql: impl Into<String>) {
        self.migrations.insert(name.into(), sql.into());
    }

    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }
}

impl<N, S> FromIterator<(N, S)> for MemorySource
where
    N: Into<String>,
    S: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, S)>>(iter: I) -> Self {
        let mut source = Self::new();
        for (name, sql) in iter {
            source.insert(name, sql);
        }
        source
    }
}

impl MigrationSource for MemorySource {
    fn names(&self) -> CoreResult<Vec<String>> {
        Ok(self.migrations.keys().cloned().collect())
    }

    fn migration(&self, name: &str) -> CoreResult<String> {
        self.migrations
            .get(name)
            .cloned()
            .ok_or_else(|| CoreError::MigrationNotFound {
                name: name.to_string(),
            })
    }
}

/// Scripts compiled into the binary, typically with `include_str!`.
///
/// ```
/// use sf_core::{EmbeddedSource, MigrationSource};
///
/// static MIGRATIONS: &[(&str, &str)] = &[(
///     "1_create.sql",
///     "--- database id 1\n--- database up\nCREATE TABLE t (id INT);",
/// )];
///
/// let source = EmbeddedSource::new(MIGRATIONS);
/// assert_eq!(source.names().unwrap(), vec!["1_create.sql"]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedSource {
    migrations: &'static [(&'static str, &'static str)],
}

impl EmbeddedSource {
    pub const fn new(migrations: &'static [(&'static str, &'static str)]) -> Self {
        Self { migrations }
    }
}

impl MigrationSource for EmbeddedSource {
    fn names(&self) -> CoreResult<Vec<String>> {
        Ok(self
            .migrations
            .iter()
            .map(|(name, _)| (*name).to_string())
            .collect())
    }

    fn migration(&self, name: &str) -> CoreResult<String> {
        self.migrations
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, sql)| (*sql).to_string())
            .ok_or_else(|| CoreError::MigrationNotFound {
                name: name.to_string(),
            })
    }
}

/// Scripts stored as files directly inside one directory.
///
/// Subdirectories are not scanned. File names that are not valid UTF-8 are
/// skipped.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the scripts are read from
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn io_error(path: &Path, source: std::io::Error) -> CoreError {
        CoreError::IoWithPath {
            path: path.display().to_string(),
            source,
        }
    }
}

impl MigrationSource for DirectorySource {
    fn names(&self) -> CoreResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.dir).map_err(|e| Self::io_error(&self.dir, e))? {
            let entry = entry.map_err(|e| Self::io_error(&self.dir, e))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => log::warn!("Skipping non UTF-8 migration file name: {:?}", raw),
            }
        }
        Ok(names)
    }

    fn migration(&self, name: &str) -> CoreResult<String> {
        if name.contains(['/', '\\']) || name == ".." || name == "." {
            return Err(CoreError::MigrationNotFound {
                name: name.to_string(),
            });
        }
        let path = self.dir.join(name);
        if !path.is_file() {
            return Err(CoreError::MigrationNotFound {
                name: name.to_string(),
            });
        }
        std::fs::read_to_string(&path).map_err(|e| Self::io_error(&path, e))
    }
}

#[cfg(test)]
#[path = "source_test.rs"]
mod tests;
