use super::*;

fn config_in(dir: &Path) -> Config {
    Config {
        locations: vec![dir.join("migrations").to_string_lossy().into_owned()],
        ..Config::default()
    }
}

#[test]
fn test_create_with_explicit_version() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let path = create_empty_migration(&config, "add users", Some("12")).unwrap();

    assert_eq!(
        path.file_name().unwrap().to_string_lossy(),
        "V12__add-users.sql"
    );
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "SELECT 1;");
}

#[test]
fn test_create_without_version_uses_timestamp() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let path = create_empty_migration(&config, "init", None).unwrap();

    let filename = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(filename.starts_with('V'));
    assert!(filename.ends_with("__init.sql"));
    // V + yyyymmddHHMM
    let version = &filename[1..filename.len() - "__init.sql".len()];
    assert_eq!(version.len(), 12);
    assert!(version.chars().all(|c| c.is_ascii_digit()));
}

#[test]
fn test_create_makes_missing_directories() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let path = create_empty_migration(&config, "first", Some("1")).unwrap();
    assert!(path.exists());
    assert!(path.parent().unwrap().ends_with("migrations"));
}
