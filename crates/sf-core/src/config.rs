//! Configuration types and parsing for schemaflow.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File names probed by [`Config::load_from_dir`], in order
pub const CONFIG_FILE_NAMES: &[&str] = &["schemaflow.yml", "schemaflow.yaml"];

/// Project configuration from schemaflow.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Database file, relative to the project directory unless absolute.
    /// `:memory:` selects an in-memory database.
    pub database: PathBuf,

    /// Directory holding `<digits>_<name>.sql` migration scripts
    #[serde(default)]
    pub migrations: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for schemaflow.yml or schemaflow.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        for name in CONFIG_FILE_NAMES {
            let path = dir.join(name);
            if path.exists() {
                return Self::load(&path);
            }
        }
        Err(CoreError::ConfigNotFound {
            path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
        })
    }

    /// Database location with relative paths joined onto `root`
    pub fn database_path(&self, root: &Path) -> PathBuf {
        if self.database.as_os_str() == ":memory:" {
            return self.database.clone();
        }
        resolve(root, &self.database)
    }

    /// Migrations directory with relative paths joined onto `root`
    pub fn migrations_dir(&self, root: &Path) -> Option<PathBuf> {
        self.migrations.as_deref().map(|dir| resolve(root, dir))
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.database.as_os_str().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "database path cannot be empty".to_string(),
            });
        }
        if self
            .migrations
            .as_ref()
            .is_some_and(|dir| dir.as_os_str().is_empty())
        {
            return Err(CoreError::ConfigInvalid {
                message: "migrations directory cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
