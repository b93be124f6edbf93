//! Create command implementation - scaffolds an empty migration file

use anyhow::{Context, Result};
use stratum_migrate::create_empty_migration;

use crate::cli::{CreateArgs, GlobalArgs};
use crate::commands::common;

/// Execute the create command
pub(crate) async fn execute(args: &CreateArgs, global: &GlobalArgs) -> Result<()> {
    let config = common::load_config(global)?;
    let path = create_empty_migration(&config, &args.name, args.version.as_deref())
        .context("Failed to create migration file")?;
    println!("Created {}", path.display());
    Ok(())
}
