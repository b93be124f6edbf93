//! Client trait definitions

use crate::error::DbResult;
use async_trait::async_trait;
use std::collections::HashMap;

/// One result row: column name to text-protocol value.
pub type SqlRow = HashMap<String, Option<String>>;

/// A held database connection the runner sends raw SQL through.
///
/// Implementations must be Send + Sync for async operation. Statements
/// may contain multiple semicolon-separated commands (the history-table
/// DDL does), so implementations use a protocol that allows that.
#[async_trait]
pub trait SqlClient: Send + Sync {
    /// Execute raw SQL, returning any result rows as text values.
    async fn query(&self, sql: &str) -> DbResult<Vec<SqlRow>>;
}

/// Produces the single connection a migration run holds for its
/// lifetime. Injected at runner construction so the runner never
/// selects a driver itself.
#[async_trait]
pub trait ClientFactory: Send + Sync {
    /// Connect to the database behind the given connection string.
    async fn connect(&self, database_url: &str) -> DbResult<Box<dyn SqlClient>>;
}
