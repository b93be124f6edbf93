use super::*;

fn parse_name(filename: &str) -> Migration {
    Migration::parse(
        Path::new(filename),
        "migrations",
        ".sql",
        "__",
        "--",
        "SELECT 1;",
    )
}

#[test]
fn test_versioned_classification() {
    let m = parse_name("migrations/V1__init.sql");
    assert_eq!(m.kind, MigrationKind::Versioned);
    assert_eq!(m.version, Some(1));
    assert_eq!(m.name.as_deref(), Some("init"));
    assert_eq!(m.filename.as_deref(), Some("V1__init.sql"));
    assert_eq!(m.filedir.as_deref(), Some("migrations"));
    assert_eq!(m.script.as_deref(), Some("V1__init.sql"));
    assert!(m.checksum.is_some());
}

#[test]
fn test_undo_classification() {
    let m = parse_name("migrations/U2__drop-users.sql");
    assert_eq!(m.kind, MigrationKind::Undo);
    assert_eq!(m.version, Some(2));
    assert_eq!(m.name.as_deref(), Some("drop-users"));
}

#[test]
fn test_repeatable_classification() {
    let m = parse_name("migrations/R__refresh-views.sql");
    assert_eq!(m.kind, MigrationKind::Repeatable);
    assert_eq!(m.version, None);
    assert_eq!(m.name.as_deref(), Some("refresh-views"));
}

#[test]
fn test_callback_classification() {
    let m = parse_name("migrations/beforeEachMigrate.sql");
    assert_eq!(
        m.kind,
        MigrationKind::Callback(CallbackKind::BeforeEachMigrate)
    );
    // No separator segment: the description falls back to the first
    // segment with the suffix stripped.
    assert_eq!(m.name.as_deref(), Some("beforeEachMigrate"));
}

#[test]
fn test_callback_longest_prefix_wins() {
    let m = parse_name("migrations/afterEachMigrateStatementError.sql");
    assert_eq!(
        m.kind,
        MigrationKind::Callback(CallbackKind::AfterEachMigrateStatementError)
    );

    let m = parse_name("migrations/afterMigrateApplied__audit.sql");
    assert_eq!(
        m.kind,
        MigrationKind::Callback(CallbackKind::AfterMigrateApplied)
    );
    assert_eq!(m.name.as_deref(), Some("audit"));
}

#[test]
fn test_unclassified_degrades_to_adhoc() {
    let m = parse_name("migrations/create_users.sql");
    assert_eq!(m.kind, MigrationKind::Adhoc);
    assert!(!m.is_tracked());
}

#[test]
fn test_version_with_non_numeric_tail_is_absent() {
    let m = parse_name("migrations/Vnext__init.sql");
    assert_eq!(m.kind, MigrationKind::Versioned);
    assert_eq!(m.version, None);
}

#[test]
fn test_description_stops_at_second_separator() {
    let m = parse_name("migrations/V3__add__extra.sql");
    assert_eq!(m.version, Some(3));
    assert_eq!(m.name.as_deref(), Some("add"));
}

#[test]
fn test_statement_splitting() {
    let m = Migration::parse(
        Path::new("migrations/V1__init.sql"),
        "migrations",
        ".sql",
        "__",
        "--",
        "SELECT 1;\n--\nSELECT 2;",
    );
    assert_eq!(m.statements, vec!["SELECT 1;", "SELECT 2;"]);
    assert_eq!(m.statement_lines, vec![2, 3]);
}

#[test]
fn test_statement_splitting_multiline_statement() {
    let m = Migration::parse(
        Path::new("migrations/V1__init.sql"),
        "migrations",
        ".sql",
        "__",
        "--",
        "CREATE TABLE t (\n  id INT\n);\n--\nSELECT 1;",
    );
    assert_eq!(m.statements, vec!["CREATE TABLE t (\n  id INT\n);", "SELECT 1;"]);
    assert_eq!(m.statement_lines, vec![4, 5]);
}

#[test]
fn test_statement_splitting_separator_at_eof_closes_statement() {
    let m = Migration::parse(
        Path::new("migrations/V1__init.sql"),
        "migrations",
        ".sql",
        "__",
        "--",
        "SELECT 1;\n--\n",
    );
    // The delimiter closes the first statement; the trailing newline
    // leaves one empty final statement, which is not suppressed.
    assert_eq!(m.statements, vec!["SELECT 1;", ""]);
    assert_eq!(m.statement_lines, vec![2, 3]);
}

#[test]
fn test_script_relative_to_location_root() {
    let dir = tempfile::tempdir().unwrap();
    let location = dir.path().join("migrations");
    std::fs::create_dir_all(location.join("tenants")).unwrap();
    let filepath = location.join("tenants/V7__seed.sql");
    std::fs::write(&filepath, "SELECT 1;").unwrap();

    let location = location.to_string_lossy().into_owned();
    let m = Migration::parse(&filepath, &location, ".sql", "__", "--", "SELECT 1;");
    let script = m.script.unwrap();
    assert_eq!(script.replace('\\', "/"), "tenants/V7__seed.sql");
}

#[test]
fn test_adhoc_from_statements() {
    let m = Migration::from_statements(vec!["SELECT 1".to_string()]);
    assert_eq!(m.kind, MigrationKind::Adhoc);
    assert!(m.filepath.is_none());
    assert!(m.checksum.is_none());
    assert_eq!(m.statements.len(), 1);
}

#[test]
fn test_placeholders_expose_migration_fields() {
    let m = parse_name("migrations/V1__init.sql");
    let placeholders = m.placeholders();
    assert_eq!(
        placeholders.get("filename").map(String::as_str),
        Some("V1__init.sql")
    );
    assert_eq!(
        placeholders.get("script").map(String::as_str),
        Some("V1__init.sql")
    );
    assert_eq!(placeholders.get("version").map(String::as_str), Some("1"));
    assert!(placeholders.contains_key("checksum"));
}
