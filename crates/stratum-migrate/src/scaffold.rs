//! Empty-migration scaffolding

use crate::error::{MigrateError, MigrateResult};
use std::path::{Path, PathBuf};
use stratum_core::{Config, CoreError};

/// Create an empty versioned migration file under the first configured
/// location, returning its path.
///
/// The filename is `V<version><separator><name><suffix>`, with spaces
/// in the name replaced by dashes. When no version is given, the
/// current local time formatted `%Y%m%d%H%M` is used, so files created
/// later sort later.
pub fn create_empty_migration(
    config: &Config,
    name: &str,
    version: Option<&str>,
) -> MigrateResult<PathBuf> {
    log::info!("Name: {}", name);
    if let Some(version) = version {
        log::info!("Version: {}", version);
    }
    log::info!("Locations: {}", config.locations.join(","));

    let location = config.locations.first().ok_or_else(|| {
        MigrateError::Core(CoreError::ConfigInvalid {
            message: "At least one locations entry must be specified".to_string(),
        })
    })?;
    let suffix = config.sql_migration_suffixes.first().ok_or_else(|| {
        MigrateError::Core(CoreError::ConfigInvalid {
            message: "At least one sql_migration_suffixes entry must be specified".to_string(),
        })
    })?;

    let version = version
        .map(String::from)
        .unwrap_or_else(|| chrono::Local::now().format("%Y%m%d%H%M").to_string());
    let filename = format!(
        "V{}{}{}{}",
        version,
        config.sql_migration_separator,
        name.replace(' ', "-"),
        suffix,
    );

    let path = Path::new(location).join(filename);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, "SELECT 1;")?;

    log::info!("Migration \"{}\" was created successfully!", path.display());
    Ok(path)
}

#[cfg(test)]
#[path = "scaffold_test.rs"]
mod tests;
