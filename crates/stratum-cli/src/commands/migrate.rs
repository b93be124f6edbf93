//! Migrate command implementation

use anyhow::{Context, Result};
use stratum_migrate::{MigrateOptions, MigrationRunner};

use crate::cli::{GlobalArgs, MigrateArgs};
use crate::commands::common;

/// Execute the migrate command
pub(crate) async fn execute(args: &MigrateArgs, global: &GlobalArgs) -> Result<()> {
    let mut config = common::load_config(global)?;
    if args.database_url.is_some() {
        config.database_url = args.database_url.clone();
    }

    let options = MigrateOptions::from_config(&config, args.dry_run);
    let runner =
        MigrationRunner::new(options).context("Failed to construct migration runner")?;
    runner.migrate().await.context("Migration run failed")?;

    if args.dry_run {
        println!("Dry run complete - no statements were sent to the database");
    } else {
        println!("Migration run completed successfully");
    }
    Ok(())
}
