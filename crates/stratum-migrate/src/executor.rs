//! Statement execution with placeholder substitution and dry-run

use crate::error::MigrateResult;
use std::collections::BTreeMap;
use stratum_db::{SqlClient, SqlRow};

/// Sends single statements through the held connection, or logs them
/// when running dry or connectionless.
#[derive(Debug, Clone, Copy)]
pub struct SqlExecutor {
    dry_run: bool,
}

impl SqlExecutor {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Replace every `%key%` occurrence with its placeholder value.
    pub fn substitute(statement: &str, placeholders: &BTreeMap<String, String>) -> String {
        let mut result = statement.to_string();
        for (key, value) in placeholders {
            result = result.replace(&format!("%{}%", key), value);
        }
        result
    }

    /// Execute one statement. In dry-run, or without a connection, the
    /// substituted statement is only logged and no rows come back.
    pub async fn exec(
        &self,
        client: Option<&dyn SqlClient>,
        statement: &str,
        placeholders: &BTreeMap<String, String>,
    ) -> MigrateResult<Vec<SqlRow>> {
        let statement = Self::substitute(statement, placeholders);
        match client {
            Some(client) if !self.dry_run => Ok(client.query(&statement).await?),
            _ => {
                log::info!("execute (dry-run): {}", statement);
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
#[path = "executor_test.rs"]
mod tests;
