//! stratum-db - Database abstraction layer for Stratum
//!
//! This crate provides the `SqlClient` and `ClientFactory` traits and
//! their tokio-postgres implementations. The migration runner only
//! talks to these traits; it never imports a driver itself.

pub mod error;
pub mod postgres;
pub mod traits;

pub use error::{DbError, DbResult};
pub use postgres::{PgClient, PgClientFactory};
pub use traits::{ClientFactory, SqlClient, SqlRow};
