use super::*;

fn placeholders(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_substitute_replaces_every_occurrence() {
    let result = SqlExecutor::substitute(
        "COMMENT ON TABLE t IS '%script% / %script%';",
        &placeholders(&[("script", "V1__init.sql")]),
    );
    assert_eq!(result, "COMMENT ON TABLE t IS 'V1__init.sql / V1__init.sql';");
}

#[test]
fn test_substitute_leaves_unknown_keys_alone() {
    let result = SqlExecutor::substitute("SELECT '%unknown%';", &placeholders(&[]));
    assert_eq!(result, "SELECT '%unknown%';");
}

#[tokio::test]
async fn test_exec_without_client_returns_no_rows() {
    let executor = SqlExecutor::new(false);
    let rows = executor
        .exec(None, "SELECT 1;", &placeholders(&[]))
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_dry_run_never_reaches_the_client() {
    use async_trait::async_trait;
    use stratum_db::{DbResult, SqlClient, SqlRow};

    struct PanickingClient;

    #[async_trait]
    impl SqlClient for PanickingClient {
        async fn query(&self, _sql: &str) -> DbResult<Vec<SqlRow>> {
            panic!("dry run must not execute SQL");
        }
    }

    let executor = SqlExecutor::new(true);
    let rows = executor
        .exec(Some(&PanickingClient), "DROP TABLE users;", &placeholders(&[]))
        .await
        .unwrap();
    assert!(rows.is_empty());
}
