//! New command implementation

use anyhow::{bail, Context, Result};
use std::fs;
use vs_core::script::{next_number, script_file_names};

use crate::cli::{GlobalArgs, NewArgs};
use crate::commands::common::load_project;

/// Execute the new command
pub fn execute(args: &NewArgs, global: &GlobalArgs) -> Result<()> {
    if args.name.is_empty()
        || !args
            .name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        bail!(
            "Invalid script name '{}': use letters, digits and underscores",
            args.name
        );
    }

    let project = load_project(global)?;
    let scripts = project.scripts()?;
    let dir = project
        .migration_paths()
        .into_iter()
        .next()
        .context("No migration path configured")?;
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let after_bootstrap = project
        .config
        .bootstrap_version
        .checked_add(1)
        .context("Bootstrap version leaves no room for scripts")?;
    let number = next_number(&scripts)
        .context("Failed to pick the next script number")?
        .max(after_bootstrap);
    let (up_name, down_name) = script_file_names(number, &args.name);
    for (file_name, header) in [
        (&up_name, "-- upgrade"),
        (&down_name, "-- rollback"),
    ] {
        let path = dir.join(file_name);
        fs::write(&path, format!("{header}: {}\n", args.name))
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Created {}", path.display());
    }
    Ok(())
}
