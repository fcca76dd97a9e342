//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use vs_core::{
    discover_scripts, BroadcastListener, Config, LoggingListener, MigrationScript, SyncPlan,
    Versioner,
};
use vs_db::{build_versions, DuckDbBackend, TableVersionApplier, TransactionalListener};

use crate::cli::GlobalArgs;

/// Install the process logger. `RUST_LOG` overrides the default filter.
pub(crate) fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

/// A loaded project: its root directory and configuration.
pub(crate) struct Project {
    pub(crate) root: PathBuf,
    pub(crate) config: Config,
}

impl Project {
    pub(crate) fn migration_paths(&self) -> Vec<PathBuf> {
        self.config.migration_paths_absolute(&self.root)
    }

    pub(crate) fn scripts(&self) -> Result<Vec<MigrationScript>> {
        discover_scripts(&self.migration_paths()).context("Failed to discover migration scripts")
    }
}

/// Load the project configuration from global args
pub(crate) fn load_project(global: &GlobalArgs) -> Result<Project> {
    let root = Path::new(&global.project_dir).to_path_buf();
    let config = match &global.config {
        Some(path) => Config::load(Path::new(path)),
        None => Config::load_from_dir(&root),
    }
    .with_context(|| format!("Failed to load project at {}", root.display()))?;
    log::debug!("loaded config for database {}", config.database);
    Ok(Project { root, config })
}

/// Open the project's database
pub(crate) fn open_backend(project: &Project) -> Result<Arc<DuckDbBackend>> {
    let path = project.config.database_path(&project.root);
    let backend = DuckDbBackend::new(&path)
        .with_context(|| format!("Failed to open database: {path}"))?;
    Ok(Arc::new(backend))
}

/// Build a versioner over the project's scripts with the configured listeners
pub(crate) fn build_versioner(
    project: &Project,
    backend: &Arc<DuckDbBackend>,
) -> Result<Versioner<TableVersionApplier>> {
    let config = &project.config;
    let versions = build_versions(
        backend,
        &config.version_table,
        config.bootstrap_version,
        project.scripts()?,
    )?;
    let applier = TableVersionApplier::new(Arc::clone(backend), config.version_table.as_str());

    let mut listeners = BroadcastListener::default();
    if config.log_changes {
        listeners.push(LoggingListener::with_level(log::Level::Info));
    }
    if config.transactional {
        listeners.push(TransactionalListener::new(Arc::clone(backend)));
    }
    Ok(Versioner::new(applier, versions).with_listener(listeners))
}

/// Print the versions a sync would apply
pub(crate) fn print_plan(plan: &SyncPlan) {
    if plan.is_noop() {
        println!("Already at version {}", plan.current);
        return;
    }
    println!(
        "Would {} from {} to {}:",
        plan.direction, plan.current, plan.target
    );
    if plan.versions.is_empty() {
        println!("  (no versions in range)");
    }
    for version in &plan.versions {
        println!("  {} version {}", plan.direction, version);
    }
}
