//! Configuration types and parsing for stratum.yml

use crate::error::{CoreError, CoreResult};
use crate::history::{DEFAULT_HISTORY_SCHEMA, DEFAULT_HISTORY_TABLE};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Project configuration from stratum.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directories scanned for migration files
    #[serde(default = "default_locations")]
    pub locations: Vec<String>,

    /// Name of the history ledger table
    #[serde(default = "default_history_table")]
    pub history_table: String,

    /// Schema the ledger table lives in; empty disables qualification
    #[serde(default = "default_history_schema")]
    pub history_schema: Option<String>,

    /// File suffixes treated as migrations
    #[serde(default = "default_suffixes")]
    pub sql_migration_suffixes: Vec<String>,

    /// Separator between the version segment and the description
    #[serde(default = "default_separator")]
    pub sql_migration_separator: String,

    /// A line equal to this string ends the current statement
    #[serde(default = "default_statement_separator")]
    pub sql_migration_statement_separator: String,

    /// Database connection string; usually supplied via flag or
    /// DATABASE_URL rather than committed to the config file
    #[serde(default)]
    pub database_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locations: default_locations(),
            history_table: default_history_table(),
            history_schema: default_history_schema(),
            sql_migration_suffixes: default_suffixes(),
            sql_migration_separator: default_separator(),
            sql_migration_statement_separator: default_statement_separator(),
            database_url: None,
        }
    }
}

fn default_locations() -> Vec<String> {
    vec!["migrations".to_string()]
}

fn default_history_table() -> String {
    DEFAULT_HISTORY_TABLE.to_string()
}

fn default_history_schema() -> Option<String> {
    Some(DEFAULT_HISTORY_SCHEMA.to_string())
}

fn default_suffixes() -> Vec<String> {
    vec![".sql".to_string()]
}

fn default_separator() -> String {
    "__".to_string()
}

fn default_statement_separator() -> String {
    "--".to_string()
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory.
    /// Looks for stratum.yml or stratum.yaml, falling back to defaults
    /// when neither exists.
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("stratum.yml");
        let yaml_path = dir.join("stratum.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.locations.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "At least one locations entry must be specified".to_string(),
            });
        }
        if self.sql_migration_suffixes.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "At least one sql_migration_suffixes entry must be specified".to_string(),
            });
        }
        if self.sql_migration_separator.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "sql_migration_separator cannot be empty".to_string(),
            });
        }
        if self.sql_migration_statement_separator.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "sql_migration_statement_separator cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
