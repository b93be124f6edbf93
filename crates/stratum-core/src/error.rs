//! Error types for stratum-core

use thiserror::Error;

/// Core error type for Stratum
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Invalid configuration value
    #[error("[E002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E003: IO error
    #[error("[E003] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// E004: IO error with file path context
    #[error("[E004] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E005: Config/YAML parse error
    #[error("[E005] Config parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// E006: A history row came back without a required column
    #[error("[E006] History row is missing column '{column}'")]
    HistoryColumnMissing { column: String },

    /// E007: A history row column could not be decoded
    #[error("[E007] History column '{column}' has unexpected value '{value}'")]
    HistoryColumnInvalid { column: String, value: String },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
