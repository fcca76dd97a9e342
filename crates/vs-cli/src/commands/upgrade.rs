//! Upgrade command implementation

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, UpgradeArgs};
use crate::commands::common::{build_versioner, load_project, open_backend, print_plan};

/// Execute the upgrade command
pub fn execute(args: &UpgradeArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let backend = open_backend(&project)?;
    let mut versioner = build_versioner(&project, &backend)?;
    let last = versioner.last_version();

    if args.dry_run {
        let plan = versioner
            .plan(last)
            .context("Failed to read current version")?;
        print_plan(&plan);
        return Ok(());
    }

    versioner
        .upgrade_to_last()
        .with_context(|| format!("Upgrade to version {last} failed"))?;
    let current = versioner.current_version()?;
    println!("Database at version {current}");
    Ok(())
}
