//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use std::path::Path;
use stratum_core::Config;

use crate::cli::GlobalArgs;

/// Load the project configuration, honoring `--config` and
/// `--project-dir`, and rebase relative locations onto the project
/// directory so commands work from anywhere.
pub(crate) fn load_config(global: &GlobalArgs) -> Result<Config> {
    let mut config = match &global.config {
        Some(path) => Config::load(Path::new(path)),
        None => Config::load_from_dir(Path::new(&global.project_dir)),
    }
    .context("Failed to load configuration")?;

    config.locations = config
        .locations
        .iter()
        .map(|location| {
            let path = Path::new(location);
            if path.is_absolute() {
                location.clone()
            } else {
                Path::new(&global.project_dir)
                    .join(path)
                    .to_string_lossy()
                    .into_owned()
            }
        })
        .collect();

    Ok(config)
}
