//! PostgreSQL client implementation

use crate::error::{DbError, DbResult};
use crate::traits::{ClientFactory, SqlClient, SqlRow};
use async_trait::async_trait;
use tokio_postgres::{NoTls, SimpleQueryMessage};

/// A single tokio-postgres connection held for the life of a run.
pub struct PgClient {
    client: tokio_postgres::Client,
}

impl PgClient {
    /// Connect and spawn the connection driver task.
    pub async fn connect(database_url: &str) -> DbResult<Self> {
        let (client, connection) = tokio_postgres::connect(database_url, NoTls)
            .await
            .map_err(|e| DbError::ConnectionError(e.to_string()))?;

        // The connection future performs the actual socket I/O and must
        // be polled for the client to make progress.
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                log::error!("database connection error: {}", e);
            }
        });

        Ok(Self { client })
    }
}

#[async_trait]
impl SqlClient for PgClient {
    async fn query(&self, sql: &str) -> DbResult<Vec<SqlRow>> {
        // The simple-query protocol returns text values and accepts
        // multi-statement strings, both of which the runner relies on.
        let messages = self
            .client
            .simple_query(sql)
            .await
            .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))?;

        let mut rows = Vec::new();
        for message in messages {
            if let SimpleQueryMessage::Row(row) = message {
                let mut decoded = SqlRow::new();
                for (index, column) in row.columns().iter().enumerate() {
                    decoded.insert(
                        column.name().to_string(),
                        row.get(index).map(String::from),
                    );
                }
                rows.push(decoded);
            }
        }
        Ok(rows)
    }
}

/// Default [`ClientFactory`] producing [`PgClient`] connections.
#[derive(Debug, Default)]
pub struct PgClientFactory;

#[async_trait]
impl ClientFactory for PgClientFactory {
    async fn connect(&self, database_url: &str) -> DbResult<Box<dyn SqlClient>> {
        Ok(Box::new(PgClient::connect(database_url).await?))
    }
}
