//! stratum-migrate - The Stratum migration runner
//!
//! Orchestrates a migration run: discovers and parses migration files,
//! orders them naturally, applies versioned then repeatable migrations
//! inside per-migration transactions, dispatches the twelve lifecycle
//! callbacks, detects checksum drift, and records every attempt in the
//! history ledger. Also hosts the empty-migration scaffolder.

pub mod callback_index;
pub mod error;
pub mod executor;
pub mod loader;
pub mod locator;
pub mod runner;
pub mod scaffold;

pub use callback_index::CallbackIndex;
pub use error::{MigrateError, MigrateResult};
pub use executor::SqlExecutor;
pub use loader::{ContentLoader, FsContentLoader};
pub use locator::{FileLister, FsFileLister, MigrationFile};
pub use runner::{MigrateOptions, MigrationRunner};
pub use scaffold::create_empty_migration;
