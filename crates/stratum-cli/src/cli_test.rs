use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn test_migrate_flags_parse() {
    let cli = Cli::parse_from([
        "stratum",
        "migrate",
        "--dry-run",
        "--database-url",
        "postgres://localhost/app",
    ]);
    match cli.command {
        Commands::Migrate(args) => {
            assert!(args.dry_run);
            assert_eq!(
                args.database_url.as_deref(),
                Some("postgres://localhost/app")
            );
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_create_takes_name_and_version() {
    let cli = Cli::parse_from(["stratum", "create", "add users", "--version", "42"]);
    match cli.command {
        Commands::Create(args) => {
            assert_eq!(args.name, "add users");
            assert_eq!(args.version.as_deref(), Some("42"));
        }
        other => panic!("unexpected command: {:?}", other),
    }
}
