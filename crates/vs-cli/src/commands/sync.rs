//! Sync command implementation

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, SyncArgs};
use crate::commands::common::{build_versioner, load_project, open_backend, print_plan};

/// Execute the sync command
pub fn execute(args: &SyncArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let backend = open_backend(&project)?;
    let mut versioner = build_versioner(&project, &backend)?;

    if args.dry_run {
        let plan = versioner
            .plan(args.target)
            .context("Failed to read current version")?;
        print_plan(&plan);
        return Ok(());
    }

    versioner
        .sync(args.target)
        .with_context(|| format!("Sync to version {} failed", args.target))?;
    let current = versioner.current_version()?;
    println!("Database at version {current}");
    Ok(())
}
