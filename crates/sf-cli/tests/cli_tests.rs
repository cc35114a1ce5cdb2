//! Integration tests for the `sf` binary.
//!
//! Each test lays out a throwaway project directory with a schemaflow.yml
//! and a migrations folder, then drives the CLI against it.

use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Path to the compiled sf binary
fn sf_bin() -> String {
    env!("CARGO_BIN_EXE_sf").to_string()
}

/// Run an `sf` CLI command in `project` and return (stdout, stderr, success).
fn run_sf(project: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(sf_bin())
        .arg("--project-dir")
        .arg(project)
        .args(args)
        .env_remove("SF_DATABASE")
        .env_remove("SF_MIGRATIONS")
        .output()
        .unwrap_or_else(|e| panic!("Failed to execute sf with args {:?}: {}", args, e));
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

fn project_with(migrations: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("schemaflow.yml"),
        "database: app.duckdb\nmigrations: migrations\n",
    )
    .unwrap();
    let migrations_dir = dir.path().join("migrations");
    std::fs::create_dir(&migrations_dir).unwrap();
    for (name, sql) in migrations {
        std::fs::write(migrations_dir.join(name), sql).unwrap();
    }
    dir
}

const CREATE: &str = "--- database id 1\n--- database up\nCREATE TABLE people (id INT, name VARCHAR);\n--- database down\nDROP TABLE people;\n";
const POPULATE: &str = "--- database id 2\n--- database up\nINSERT INTO people VALUES (1, 'Jacinto');\n";

#[test]
fn test_migrate_then_status() {
    let project = project_with(&[("1_create.sql", CREATE), ("2_populate.sql", POPULATE)]);

    let (stdout, stderr, ok) = run_sf(project.path(), &["migrate"]);
    assert!(ok, "migrate failed: {stderr}");
    assert!(stdout.contains("Migrated 0 -> 2"), "stdout: {stdout}");
    assert!(project.path().join("app.duckdb").exists());

    let (stdout, stderr, ok) = run_sf(project.path(), &["status", "--output", "json"]);
    assert!(ok, "status failed: {stderr}");
    let status: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(status["current_version"], 2);
    assert_eq!(status["pending"].as_array().unwrap().len(), 0);
}

#[test]
fn test_migrate_dry_run_applies_nothing() {
    let project = project_with(&[("1_create.sql", CREATE)]);

    let (stdout, _, ok) = run_sf(project.path(), &["migrate", "--dry-run"]);
    assert!(ok);
    assert!(stdout.contains("1_create.sql"));

    let (stdout, _, ok) = run_sf(project.path(), &["status"]);
    assert!(ok);
    assert!(stdout.contains("not created yet"), "stdout: {stdout}");
}

#[test]
fn test_migrate_failure_exits_non_zero() {
    let project = project_with(&[(
        "1_broken.sql",
        "--- database id 1\n--- database up\nINSERT INTO nowhere VALUES (1);\n",
    )]);

    let (_, stderr, ok) = run_sf(project.path(), &["migrate"]);
    assert!(!ok);
    assert!(stderr.contains("M005"), "stderr: {stderr}");
}

#[test]
fn test_check_flags_bad_migrations() {
    let project = project_with(&[
        ("1_create.sql", CREATE),
        ("2_no_id.sql", "--- database up\nSELECT 1;\n"),
    ]);

    let (stdout, _, ok) = run_sf(project.path(), &["check"]);
    assert!(!ok);
    assert!(stdout.contains("ok    1_create.sql"), "stdout: {stdout}");
    assert!(stdout.contains("FAIL  2_no_id.sql"), "stdout: {stdout}");
}

#[test]
fn test_new_creates_timestamped_file() {
    let project = project_with(&[]);

    let (stdout, stderr, ok) = run_sf(project.path(), &["new", "add users"]);
    assert!(ok, "new failed: {stderr}");
    assert!(stdout.contains("_add_users.sql"));

    let entries: Vec<String> = std::fs::read_dir(project.path().join("migrations"))
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(entries.len(), 1);
    let name = &entries[0];
    let id = name.split('_').next().unwrap();
    assert_eq!(id.len(), 12);
    let content = std::fs::read_to_string(project.path().join("migrations").join(name)).unwrap();
    assert!(content.starts_with(&format!("--- database id {id}\n")));
}

#[test]
fn test_database_flag_without_config() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("only.duckdb");

    let (_, stderr, ok) = run_sf(dir.path(), &["--database", db.to_str().unwrap(), "migrate"]);
    assert!(ok, "migrate failed: {stderr}");
    assert!(db.exists());
}
