//! Versync CLI - bring a DuckDB database to a schema version

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::{new, status, sync, upgrade};

fn main() -> Result<()> {
    let cli = Cli::parse();
    commands::common::init_logging(cli.global.verbose);

    match &cli.command {
        cli::Commands::Status(args) => status::execute(args, &cli.global),
        cli::Commands::Sync(args) => sync::execute(args, &cli.global),
        cli::Commands::Upgrade(args) => upgrade::execute(args, &cli.global),
        cli::Commands::New(args) => new::execute(args, &cli.global),
    }
}
