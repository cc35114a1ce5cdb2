//! New command implementation

use anyhow::{bail, Context, Result};
use chrono::Utc;
use std::fs;

use crate::cli::{GlobalArgs, NewArgs};
use crate::commands::common::{load_settings, require_migrations_dir};

/// Turn a free-form description into a file name suffix.
///
/// Lowercases ASCII letters and collapses every other run of characters into
/// a single `_`. Returns `None` when nothing usable remains.
pub(crate) fn slugify(description: &str) -> Option<String> {
    let mut slug = String::with_capacity(description.len());
    for c in description.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    let slug = slug.trim_end_matches('_').to_string();
    (!slug.is_empty()).then_some(slug)
}

/// Script skeleton whose header id matches the file name prefix.
pub(crate) fn template(id: &str) -> String {
    format!("--- database id {id}\n--- database up\n\n--- database down\n\n")
}

/// Execute the new command
pub fn execute(args: &NewArgs, global: &GlobalArgs) -> Result<()> {
    let settings = load_settings(global)?;
    let dir = require_migrations_dir(&settings)?;

    let Some(slug) = slugify(&args.description) else {
        bail!("Description '{}' has no usable characters", args.description);
    };
    let id = Utc::now().format("%Y%m%d%H%M").to_string();
    let path = dir.join(format!("{id}_{slug}.sql"));

    if path.exists() {
        bail!("Migration already exists: {}", path.display());
    }
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    fs::write(&path, template(&id))
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Created {}", path.display());
    Ok(())
}
