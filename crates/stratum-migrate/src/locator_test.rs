use super::*;

fn touch(path: &Path) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, "SELECT 1;").unwrap();
}

#[test]
fn test_recursive_scan_with_suffix_filter() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("migrations");
    touch(&root.join("V1__init.sql"));
    touch(&root.join("tenants/V2__tenants.sql"));
    touch(&root.join("README.md"));

    let location = root.to_string_lossy().into_owned();
    let files = FsFileLister
        .list(&[location.clone()], &[".sql".to_string()])
        .unwrap();

    let mut names: Vec<String> = files
        .iter()
        .map(|f| {
            f.filepath
                .file_name()
                .unwrap()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    names.sort();
    assert_eq!(names, vec!["V1__init.sql", "V2__tenants.sql"]);
    assert!(files.iter().all(|f| f.location == location));
    assert!(files.iter().all(|f| f.suffix == ".sql"));
}

#[test]
fn test_missing_location_contributes_zero_files() {
    let files = FsFileLister
        .list(
            &["/nonexistent/migrations".to_string()],
            &[".sql".to_string()],
        )
        .unwrap();
    assert!(files.is_empty());
}

#[test]
fn test_multiple_suffixes_listed_per_location() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("migrations");
    touch(&root.join("V1__init.sql"));
    touch(&root.join("V2__seed.ddl"));

    let location = root.to_string_lossy().into_owned();
    let files = FsFileLister
        .list(&[location], &[".sql".to_string(), ".ddl".to_string()])
        .unwrap();
    assert_eq!(files.len(), 2);
}
