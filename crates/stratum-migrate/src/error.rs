//! Error types for stratum-migrate

use stratum_core::CoreError;
use stratum_db::DbError;
use thiserror::Error;

/// Migration runner errors
#[derive(Error, Debug)]
pub enum MigrateError {
    /// M001: No connection string while not in dry-run
    #[error("[M001] database_url not set (required unless dry-run)")]
    MissingDatabaseUrl,

    /// M002: A previously applied versioned migration changed on disk
    #[error("[M002] Checksum for migration \"{script}\" differs between the history table ({recorded}) and the file system ({actual})")]
    ChecksumMismatch {
        script: String,
        recorded: String,
        actual: String,
    },

    /// M003: IO error
    #[error("[M003] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// M004: IO error with file path context
    #[error("[M004] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// Core error passthrough
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Database error passthrough
    #[error(transparent)]
    Db(#[from] DbError),
}

/// Result type alias for MigrateError
pub type MigrateResult<T> = Result<T, MigrateError>;
