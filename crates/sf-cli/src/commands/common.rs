//! Shared helpers for CLI commands

use anyhow::{Context, Result};
use sf_core::{Config, CoreError, DirectorySource, LogCrateLogger};
use sf_db::{Migrator, MigratorConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::GlobalArgs;

/// Database and migrations locations after applying CLI overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Settings {
    pub database: PathBuf,
    pub migrations: Option<PathBuf>,
}

/// Resolve settings from the project config file and global flags.
///
/// The config file may be absent when `--database` is given.
pub(crate) fn load_settings(global: &GlobalArgs) -> Result<Settings> {
    let root = Path::new(&global.project_dir);
    let config = match &global.config {
        Some(path) => Some(Config::load(Path::new(path)).context("Failed to load config")?),
        None => match Config::load_from_dir(root) {
            Ok(config) => Some(config),
            Err(CoreError::ConfigNotFound { .. }) if global.database.is_some() => None,
            Err(e) => return Err(e).context("Failed to load config"),
        },
    };

    let database = match &global.database {
        Some(db) => PathBuf::from(db),
        None => config
            .as_ref()
            .map(|c| c.database_path(root))
            .context("No database configured")?,
    };
    let migrations = match &global.migrations {
        Some(dir) => Some(PathBuf::from(dir)),
        None => config.as_ref().and_then(|c| c.migrations_dir(root)),
    };

    Ok(Settings {
        database,
        migrations,
    })
}

/// The configured migrations directory, or an error naming the flag to set.
pub(crate) fn require_migrations_dir(settings: &Settings) -> Result<&Path> {
    settings.migrations.as_deref().context(
        "No migrations directory configured (set `migrations` in schemaflow.yml or pass --migrations)",
    )
}

/// Build a migrator over the settings' database and migrations directory.
pub(crate) fn build_migrator(settings: &Settings) -> Migrator {
    let mut config =
        MigratorConfig::new(&settings.database).with_logger(Arc::new(LogCrateLogger));
    if let Some(dir) = &settings.migrations {
        config = config.with_source(Arc::new(DirectorySource::new(dir)));
    }
    Migrator::new(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn global(project_dir: &Path) -> GlobalArgs {
        GlobalArgs {
            verbose: false,
            project_dir: project_dir.display().to_string(),
            config: None,
            database: None,
            migrations: None,
        }
    }

    #[test]
    fn test_settings_from_config_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("schemaflow.yml"),
            "database: app.duckdb\nmigrations: migrations\n",
        )
        .unwrap();

        let settings = load_settings(&global(dir.path())).unwrap();
        assert_eq!(settings.database, dir.path().join("app.duckdb"));
        assert_eq!(settings.migrations, Some(dir.path().join("migrations")));
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("schemaflow.yml"),
            "database: app.duckdb\nmigrations: migrations\n",
        )
        .unwrap();
        let mut args = global(dir.path());
        args.database = Some("other.duckdb".to_string());
        args.migrations = Some("elsewhere".to_string());

        let settings = load_settings(&args).unwrap();
        assert_eq!(settings.database, PathBuf::from("other.duckdb"));
        assert_eq!(settings.migrations, Some(PathBuf::from("elsewhere")));
    }

    #[test]
    fn test_database_flag_without_config_file() {
        let dir = TempDir::new().unwrap();
        let mut args = global(dir.path());
        args.database = Some(":memory:".to_string());

        let settings = load_settings(&args).unwrap();
        assert_eq!(settings.database, PathBuf::from(":memory:"));
        assert!(settings.migrations.is_none());
        assert!(require_migrations_dir(&settings).is_err());
    }

    #[test]
    fn test_missing_config_without_database_flag_fails() {
        let dir = TempDir::new().unwrap();
        assert!(load_settings(&global(dir.path())).is_err());
    }
}
