//! History ledger: table DDL, queries, and row parsing.
//!
//! Every method on [`HistoryTable`] is a pure SQL builder - no I/O
//! happens here. The table shape is compatibility-sensitive and must
//! not drift: external tooling reads these columns byte-for-byte.

use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};
use crate::migration::Migration;

/// Default name of the ledger table.
pub const DEFAULT_HISTORY_TABLE: &str = "__migrations";

/// Default schema the ledger table lives in.
pub const DEFAULT_HISTORY_SCHEMA: &str = "public";

/// Builder for all SQL touching the migration history ledger.
#[derive(Debug, Clone)]
pub struct HistoryTable {
    table: String,
    schema: Option<String>,
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_TABLE, Some(DEFAULT_HISTORY_SCHEMA))
    }
}

impl HistoryTable {
    /// Create a builder for the given table name and optional schema.
    pub fn new(table: impl Into<String>, schema: Option<impl Into<String>>) -> Self {
        Self {
            table: table.into(),
            schema: schema.map(Into::into),
        }
    }

    /// The schema-qualified, quoted table name.
    fn qualified_name(&self) -> String {
        match &self.schema {
            Some(schema) if !schema.is_empty() => {
                format!("{}.{}", quote_ident(schema), quote_ident(&self.table))
            }
            _ => quote_ident(&self.table),
        }
    }

    /// Idempotent DDL creating the ledger table, its `success` index,
    /// and the extensions the wider system requires.
    pub fn create_table_sql(&self) -> String {
        format!(
            "create table if not exists {qualified}\n\
             (\n\
             \x20   installed_rank integer                 not null\n\
             \x20       constraint {pk}\n\
             \x20           primary key,\n\
             \x20   version        varchar(50),\n\
             \x20   description    varchar(200)            not null,\n\
             \x20   type           varchar(20)             not null,\n\
             \x20   script         varchar(1000)           not null,\n\
             \x20   checksum       integer,\n\
             \x20   installed_by   varchar(100)            not null,\n\
             \x20   installed_on   timestamp default now() not null,\n\
             \x20   execution_time integer                 not null,\n\
             \x20   success        boolean                 not null\n\
             );\n\
             create index if not exists {idx}\n\
             \x20   on {qualified} (success);\n\
             CREATE EXTENSION IF NOT EXISTS \"uuid-ossp\";\n\
             CREATE EXTENSION IF NOT EXISTS \"pg_trgm\";",
            qualified = self.qualified_name(),
            pk = quote_ident(&format!("{}_pk", self.table)),
            idx = quote_ident(&format!("{}_s_idx", self.table)),
        )
    }

    /// Full history, oldest first.
    pub fn history_sql(&self) -> String {
        format!(
            "select * from {} order by installed_rank",
            self.qualified_name()
        )
    }

    /// Next free `installed_rank`.
    pub fn next_rank_sql(&self) -> String {
        format!(
            "select coalesce(max(installed_rank),0)+1 installed_rank from {}",
            self.qualified_name()
        )
    }

    /// Insert the pending row for a migration about to run.
    pub fn begin_row_sql(&self, migration: &Migration, installed_rank: i32) -> String {
        let version = migration
            .version
            .map_or_else(|| "null".to_string(), |v| v.to_string());
        let checksum = migration
            .checksum
            .map_or_else(|| "null".to_string(), |c| c.to_string());
        let description = quote_literal(migration.name.as_deref().unwrap_or(""));
        let script = quote_literal(migration.script.as_deref().unwrap_or(""));
        format!(
            "INSERT INTO {qualified}\n\
             \x20   (installed_rank, version, description, type, script,\n\
             checksum, installed_by, installed_on, execution_time, success)\n\
             VALUES\n\
             \x20 ({installed_rank}, {version}, {description}, 'SQL', {script},\n\
             \x20 {checksum}, (SELECT current_user), now(), 0, false);",
            qualified = self.qualified_name(),
        )
    }

    /// Record a migration's outcome on its pending row.
    pub fn end_row_sql(&self, installed_rank: i32, execution_time_ms: i64, success: bool) -> String {
        format!(
            "UPDATE {} SET execution_time={}, success={} where installed_rank={};",
            self.qualified_name(),
            execution_time_ms,
            success,
            installed_rank,
        )
    }
}

/// One row of the history ledger, decoded from a text-protocol row.
#[derive(Debug, Clone)]
pub struct HistoryRecord {
    pub installed_rank: i32,
    pub version: Option<String>,
    pub description: String,
    /// `'SQL'` or `'UNDO_SQL'`
    pub migration_type: String,
    pub script: String,
    pub checksum: Option<i32>,
    pub installed_by: String,
    /// Text-format timestamp as returned by the server
    pub installed_on: String,
    pub execution_time: i32,
    pub success: bool,
}

impl HistoryRecord {
    /// Decode a ledger row from column-name/text-value pairs.
    pub fn from_row(row: &HashMap<String, Option<String>>) -> CoreResult<HistoryRecord> {
        Ok(HistoryRecord {
            installed_rank: parse_column(row, "installed_rank")?,
            version: text_column(row, "version"),
            description: required_column(row, "description")?,
            migration_type: required_column(row, "type")?,
            script: required_column(row, "script")?,
            checksum: match text_column(row, "checksum") {
                Some(value) => Some(parse_value(&value, "checksum")?),
                None => None,
            },
            installed_by: required_column(row, "installed_by")?,
            installed_on: required_column(row, "installed_on")?,
            execution_time: parse_column(row, "execution_time")?,
            success: parse_bool(&required_column(row, "success")?)?,
        })
    }
}

/// Quote a SQL identifier, escaping embedded double quotes.
fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote a SQL string literal, escaping embedded single quotes.
fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn text_column(row: &HashMap<String, Option<String>>, column: &str) -> Option<String> {
    row.get(column).cloned().flatten()
}

fn required_column(row: &HashMap<String, Option<String>>, column: &str) -> CoreResult<String> {
    text_column(row, column).ok_or_else(|| CoreError::HistoryColumnMissing {
        column: column.to_string(),
    })
}

fn parse_column<T: std::str::FromStr>(
    row: &HashMap<String, Option<String>>,
    column: &str,
) -> CoreResult<T> {
    parse_value(&required_column(row, column)?, column)
}

fn parse_value<T: std::str::FromStr>(value: &str, column: &str) -> CoreResult<T> {
    value
        .parse()
        .map_err(|_| CoreError::HistoryColumnInvalid {
            column: column.to_string(),
            value: value.to_string(),
        })
}

/// Postgres text-protocol booleans arrive as `t`/`f`.
fn parse_bool(value: &str) -> CoreResult<bool> {
    match value {
        "t" | "true" => Ok(true),
        "f" | "false" => Ok(false),
        other => Err(CoreError::HistoryColumnInvalid {
            column: "success".to_string(),
            value: other.to_string(),
        }),
    }
}

#[cfg(test)]
#[path = "history_test.rs"]
mod tests;
