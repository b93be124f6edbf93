use super::*;

#[test]
fn test_defaults_match_flyway_convention() {
    let config = Config::default();
    assert_eq!(config.locations, vec!["migrations"]);
    assert_eq!(config.history_table, "__migrations");
    assert_eq!(config.history_schema.as_deref(), Some("public"));
    assert_eq!(config.sql_migration_suffixes, vec![".sql"]);
    assert_eq!(config.sql_migration_separator, "__");
    assert_eq!(config.sql_migration_statement_separator, "--");
    assert!(config.database_url.is_none());
}

#[test]
fn test_load_from_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stratum.yml");
    std::fs::write(
        &path,
        "locations:\n  - db/migrations\n  - db/seed\nhistory_table: app_history\n",
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.locations, vec!["db/migrations", "db/seed"]);
    assert_eq!(config.history_table, "app_history");
    // Unset fields fall back to defaults
    assert_eq!(config.sql_migration_separator, "__");
}

#[test]
fn test_load_from_dir_without_config_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.locations, vec!["migrations"]);
}

#[test]
fn test_load_missing_file_is_an_error() {
    let result = Config::load(Path::new("/nonexistent/stratum.yml"));
    assert!(matches!(result, Err(CoreError::ConfigNotFound { .. })));
}

#[test]
fn test_unknown_fields_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stratum.yml");
    std::fs::write(&path, "history_tabel: oops\n").unwrap();
    assert!(matches!(Config::load(&path), Err(CoreError::YamlParse(_))));
}

#[test]
fn test_empty_locations_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stratum.yml");
    std::fs::write(&path, "locations: []\n").unwrap();
    assert!(matches!(
        Config::load(&path),
        Err(CoreError::ConfigInvalid { .. })
    ));
}
