//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};

/// Stratum - Flyway-convention schema migrations for PostgreSQL
#[derive(Parser, Debug)]
#[command(name = "stratum")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply pending versioned and repeatable migrations
    Migrate(MigrateArgs),

    /// Show the migration history report
    Info(InfoArgs),

    /// Create an empty versioned migration file
    Create(CreateArgs),
}

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Log statements instead of sending them to the database
    #[arg(long)]
    pub dry_run: bool,

    /// Database connection string
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

/// Arguments for the info command
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Database connection string
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

/// Arguments for the create command
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Migration description; spaces become dashes in the filename
    pub name: String,

    /// Explicit version instead of the current timestamp
    #[arg(long)]
    pub version: Option<String>,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
