//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Versync - sync a database schema to a target version
#[derive(Parser, Debug)]
#[command(name = "versync")]
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
    #[arg(short, long, global = true, env = "VERSYNC_CONFIG")]
    pub config: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show current version and pending scripts
    Status(StatusArgs),

    /// Sync the database to a specific version
    Sync(SyncArgs),

    /// Sync the database to the last available version
    Upgrade(UpgradeArgs),

    /// Create the next numbered migration script pair
    New(NewArgs),
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: StatusOutput,
}

/// Status output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutput {
    /// Human-readable summary
    Text,
    /// JSON output
    Json,
}

/// Arguments for the sync command
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Target version
    #[arg(long = "to", allow_negative_numbers = true)]
    pub target: i64,

    /// Print the versions that would be applied without applying them
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the upgrade command
#[derive(Args, Debug)]
pub struct UpgradeArgs {
    /// Print the versions that would be applied without applying them
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the new command
#[derive(Args, Debug)]
pub struct NewArgs {
    /// Descriptive script name (letters, digits and underscores)
    pub name: String,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
