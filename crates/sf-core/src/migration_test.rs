use super::*;

fn script(lines: &[&str]) -> String {
    lines.join("\n")
}

#[test]
fn test_parse_basic_migration() {
    let raw = script(&[
        "--- database id 123",
        "--- database up",
        "SELECT 'a'",
        "--- database down",
        "SELECT 'b'",
    ]);
    let migration = parse_migration(&raw).unwrap();
    assert_eq!(migration.id.get(), 123);
    assert_eq!(migration.up, vec!["SELECT 'a'"]);
    assert_eq!(migration.down, vec!["SELECT 'b'"]);
    assert_eq!(migration.up_script(), "SELECT 'a'");
}

#[test]
fn test_parse_multiline_up_is_joined_with_spaces() {
    let raw = script(&[
        "--- database id 1",
        "--- database up",
        "CREATE TABLE people (",
        "    id INT NOT NULL,",
        "    name VARCHAR(10) NOT NULL",
        ");",
        "--- database down",
        "DROP TABLE people;",
    ]);
    let migration = parse_migration(&raw).unwrap();
    assert_eq!(migration.up.len(), 4);
    assert_eq!(
        migration.up_script(),
        "CREATE TABLE people ( id INT NOT NULL, name VARCHAR(10) NOT NULL );"
    );
    assert_eq!(migration.down_script(), "DROP TABLE people;");
}

#[test]
fn test_parse_strips_inline_comment() {
    let raw = script(&["--- database id 1", "--- database up", "SELECT 1 -- note"]);
    let migration = parse_migration(&raw).unwrap();
    assert_eq!(migration.up, vec!["SELECT 1"]);
}

#[test]
fn test_parse_truncates_at_first_hyphen_inside_data() {
    // Known limitation of the line format: the cut happens at the first
    // hyphen even when it sits inside a string literal.
    let raw = script(&[
        "--- database id 1",
        "--- database up",
        "INSERT INTO t VALUES ('a-b')",
    ]);
    let migration = parse_migration(&raw).unwrap();
    assert_eq!(migration.up, vec!["INSERT INTO t VALUES ('a"]);
}

#[test]
fn test_parse_drops_lines_before_any_section() {
    let raw = script(&[
        "SELECT 'ignored'",
        "--- database id 7",
        "also ignored",
        "--- database up",
        "SELECT 1",
    ]);
    let migration = parse_migration(&raw).unwrap();
    assert_eq!(migration.up, vec!["SELECT 1"]);
    assert!(migration.down.is_empty());
}

#[test]
fn test_parse_handles_crlf_line_endings() {
    let raw = "--- database id 5\r\n--- database up\r\nSELECT 1\r\n";
    let migration = parse_migration(raw).unwrap();
    assert_eq!(migration.id.get(), 5);
    assert_eq!(migration.up_script(), "SELECT 1");
}

#[test]
fn test_parse_timestamp_identifier() {
    let raw = script(&[
        "--- database id 201704080412",
        "--- database up",
        "SELECT 'a'",
    ]);
    let migration = parse_migration(&raw).unwrap();
    assert_eq!(migration.id.get(), 201_704_080_412);
}

#[test]
fn test_parse_last_id_header_wins() {
    let raw = script(&[
        "--- database id 3",
        "--- database id 4",
        "--- database up",
        "SELECT 1",
    ]);
    assert_eq!(parse_migration(&raw).unwrap().id.get(), 4);
}

#[test]
fn test_parse_sections_can_switch_back() {
    let raw = script(&[
        "--- database id 9",
        "--- database up",
        "SELECT 1",
        "--- database down",
        "SELECT 2",
        "--- database up",
        "SELECT 3",
    ]);
    let migration = parse_migration(&raw).unwrap();
    assert_eq!(migration.up, vec!["SELECT 1", "SELECT 3"]);
    assert_eq!(migration.down, vec!["SELECT 2"]);
}

#[test]
fn test_parse_missing_identifier() {
    let raw = script(&["--- database up", "SELECT 1"]);
    let err = parse_migration(&raw).unwrap_err();
    assert!(matches!(err, CoreError::MissingIdentifier));
}

#[test]
fn test_parse_zero_identifier_is_missing() {
    let raw = script(&["--- database id 0", "--- database up", "SELECT 1"]);
    let err = parse_migration(&raw).unwrap_err();
    assert!(matches!(err, CoreError::MissingIdentifier));
}

#[test]
fn test_parse_empty_up_section() {
    let raw = script(&[
        "--- database id 12",
        "--- database up",
        "   ",
        "-- only a comment",
        "--- database down",
        "DROP TABLE x;",
    ]);
    let err = parse_migration(&raw).unwrap_err();
    assert!(matches!(err, CoreError::EmptyMigration { id: 12 }));
}

#[test]
fn test_parse_missing_identifier_reported_before_empty() {
    let err = parse_migration("").unwrap_err();
    assert!(matches!(err, CoreError::MissingIdentifier));
}

#[test]
fn test_parse_identifier_overflow_is_malformed() {
    let raw = script(&[
        "--- database id 99999999999999999999",
        "--- database up",
        "SELECT 1",
    ]);
    let err = parse_migration(&raw).unwrap_err();
    assert!(matches!(err, CoreError::MalformedMigration { .. }));
}

#[test]
fn test_migration_id_rejects_non_positive() {
    assert!(MigrationId::new(0).is_none());
    assert!(MigrationId::new(-4).is_none());
    assert_eq!(MigrationId::new(8).unwrap().to_string(), "8");
}
