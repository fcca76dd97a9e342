use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn parse_sync_to_negative_version() {
    let cli = Cli::try_parse_from(["versync", "sync", "--to", "-1"]).unwrap();
    match cli.command {
        Commands::Sync(args) => {
            assert_eq!(args.target, -1);
            assert!(!args.dry_run);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parse_global_args_after_subcommand() {
    let cli = Cli::try_parse_from(["versync", "upgrade", "--dry-run", "-v", "-p", "db"]).unwrap();
    assert!(cli.global.verbose);
    assert_eq!(cli.global.project_dir, "db");
    assert!(matches!(cli.command, Commands::Upgrade(UpgradeArgs { dry_run: true })));
}

#[test]
fn sync_requires_target() {
    assert!(Cli::try_parse_from(["versync", "sync"]).is_err());
}

#[test]
fn status_output_defaults_to_text() {
    let cli = Cli::try_parse_from(["versync", "status"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Status(StatusArgs {
            output: StatusOutput::Text
        })
    ));
}
