//! Status command implementation

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::{GlobalArgs, StatusArgs, StatusOutput};
use crate::commands::common::{build_versioner, load_project, open_backend};

/// Versions known to the project and what an upgrade would apply
#[derive(Debug, Serialize)]
struct StatusReport {
    database: String,
    current_version: i64,
    last_version: i64,
    pending: Vec<i64>,
}

/// Execute the status command
pub fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let backend = open_backend(&project)?;
    let versioner = build_versioner(&project, &backend)?;

    let last_version = versioner.last_version();
    let plan = versioner
        .plan(last_version)
        .context("Failed to read current version")?;

    let report = StatusReport {
        database: project.config.database_path(&project.root),
        current_version: plan.current,
        last_version,
        pending: plan.versions,
    };

    match args.output {
        StatusOutput::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        StatusOutput::Text => {
            println!("Database:        {}", report.database);
            println!("Current version: {}", report.current_version);
            println!("Last version:    {}", report.last_version);
            if report.pending.is_empty() {
                println!("Up to date");
            } else {
                let pending: Vec<String> = report.pending.iter().map(i64::to_string).collect();
                println!("Pending:         {}", pending.join(", "));
            }
        }
    }
    Ok(())
}
