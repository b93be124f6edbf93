use super::*;
use crate::migration::Migration;
use std::path::Path;

fn row(pairs: &[(&str, Option<&str>)]) -> HashMap<String, Option<String>> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.map(String::from)))
        .collect()
}

#[test]
fn test_create_table_sql_shape() {
    let sql = HistoryTable::default().create_table_sql();
    assert!(sql.starts_with("create table if not exists \"public\".\"__migrations\""));
    assert!(sql.contains("installed_rank integer"));
    assert!(sql.contains("constraint \"__migrations_pk\""));
    assert!(sql.contains("version        varchar(50)"));
    assert!(sql.contains("description    varchar(200)            not null"));
    assert!(sql.contains("type           varchar(20)             not null"));
    assert!(sql.contains("script         varchar(1000)           not null"));
    assert!(sql.contains("checksum       integer"));
    assert!(sql.contains("installed_by   varchar(100)            not null"));
    assert!(sql.contains("installed_on   timestamp default now() not null"));
    assert!(sql.contains("execution_time integer                 not null"));
    assert!(sql.contains("success        boolean                 not null"));
    assert!(sql.contains("create index if not exists \"__migrations_s_idx\""));
    assert!(sql.contains("CREATE EXTENSION IF NOT EXISTS \"uuid-ossp\";"));
    assert!(sql.contains("CREATE EXTENSION IF NOT EXISTS \"pg_trgm\";"));
}

#[test]
fn test_unqualified_when_schema_absent() {
    let table = HistoryTable::new("history", None::<String>);
    assert_eq!(
        table.history_sql(),
        "select * from \"history\" order by installed_rank"
    );
}

#[test]
fn test_next_rank_sql() {
    let sql = HistoryTable::default().next_rank_sql();
    assert_eq!(
        sql,
        "select coalesce(max(installed_rank),0)+1 installed_rank from \"public\".\"__migrations\""
    );
}

#[test]
fn test_begin_row_sql_for_versioned_migration() {
    let m = Migration::parse(
        Path::new("migrations/V1__init.sql"),
        "migrations",
        ".sql",
        "__",
        "--",
        "SELECT 1;",
    );
    let sql = HistoryTable::default().begin_row_sql(&m, 4);
    assert!(sql.starts_with("INSERT INTO \"public\".\"__migrations\""));
    assert!(sql.contains("(4, 1, 'init', 'SQL', 'V1__init.sql',"));
    assert!(sql.contains("(SELECT current_user), now(), 0, false);"));
}

#[test]
fn test_begin_row_sql_repeatable_has_null_version() {
    let m = Migration::parse(
        Path::new("migrations/R__views.sql"),
        "migrations",
        ".sql",
        "__",
        "--",
        "SELECT 1;",
    );
    let sql = HistoryTable::default().begin_row_sql(&m, 1);
    assert!(sql.contains("(1, null, 'views', 'SQL', 'R__views.sql',"));
}

#[test]
fn test_begin_row_sql_escapes_quotes() {
    let m = Migration::parse(
        Path::new("migrations/V1__it's-complicated.sql"),
        "migrations",
        ".sql",
        "__",
        "--",
        "SELECT 1;",
    );
    let sql = HistoryTable::default().begin_row_sql(&m, 1);
    assert!(sql.contains("'it''s-complicated'"));
}

#[test]
fn test_end_row_sql() {
    let sql = HistoryTable::default().end_row_sql(9, 125, true);
    assert_eq!(
        sql,
        "UPDATE \"public\".\"__migrations\" SET execution_time=125, success=true where installed_rank=9;"
    );
}

#[test]
fn test_quoted_identifiers_escape_embedded_quotes() {
    let table = HistoryTable::new("odd\"name", Some("public"));
    assert!(table.history_sql().contains("\"odd\"\"name\""));
}

#[test]
fn test_history_record_from_row() {
    let record = HistoryRecord::from_row(&row(&[
        ("installed_rank", Some("3")),
        ("version", Some("2")),
        ("description", Some("add-users")),
        ("type", Some("SQL")),
        ("script", Some("V2__add-users.sql")),
        ("checksum", Some("-123456")),
        ("installed_by", Some("app")),
        ("installed_on", Some("2026-08-06 10:00:00.000000")),
        ("execution_time", Some("42")),
        ("success", Some("t")),
    ]))
    .unwrap();
    assert_eq!(record.installed_rank, 3);
    assert_eq!(record.version.as_deref(), Some("2"));
    assert_eq!(record.checksum, Some(-123456));
    assert_eq!(record.execution_time, 42);
    assert!(record.success);
}

#[test]
fn test_history_record_nullable_columns() {
    let record = HistoryRecord::from_row(&row(&[
        ("installed_rank", Some("1")),
        ("version", None),
        ("description", Some("views")),
        ("type", Some("SQL")),
        ("script", Some("R__views.sql")),
        ("checksum", None),
        ("installed_by", Some("app")),
        ("installed_on", Some("2026-08-06 10:00:00.000000")),
        ("execution_time", Some("0")),
        ("success", Some("f")),
    ]))
    .unwrap();
    assert_eq!(record.version, None);
    assert_eq!(record.checksum, None);
    assert!(!record.success);
}

#[test]
fn test_history_record_missing_column_is_an_error() {
    let result = HistoryRecord::from_row(&row(&[("installed_rank", Some("1"))]));
    assert!(matches!(
        result,
        Err(crate::error::CoreError::HistoryColumnMissing { .. })
    ));
}
