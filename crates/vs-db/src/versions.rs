//! DuckDB-backed [`Version`] implementations.

use crate::duckdb::{split_qualified, DuckDbBackend};
use crate::error::DbResult;
use std::sync::Arc;
use vs_core::{CoreError, CoreResult, MigrationScript, Version, VersionError, VersionResult};

/// Creates the version tracking table.
///
/// Usually numbered 0 so it runs first on a pristine database. It cannot be
/// rolled back.
pub struct VersionTableBootstrap {
    backend: Arc<DuckDbBackend>,
    table: String,
    number: i64,
}

impl VersionTableBootstrap {
    pub fn new(backend: Arc<DuckDbBackend>, table: impl Into<String>, number: i64) -> Self {
        Self {
            backend,
            table: table.into(),
            number,
        }
    }

    fn create_table(&self) -> DbResult<()> {
        if self.backend.relation_exists(&self.table)? {
            log::debug!("version table {} already exists", self.table);
            return Ok(());
        }
        let (schema, _) = split_qualified(&self.table);
        if schema != "main" {
            self.backend.create_schema_if_not_exists(schema)?;
        }
        self.backend.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                 id                UUID PRIMARY KEY,
                 version           BIGINT NOT NULL,
                 modification_time TIMESTAMP NOT NULL
             )",
            self.table
        ))
    }
}

impl Version for VersionTableBootstrap {
    fn number(&self) -> i64 {
        self.number
    }

    fn upgrade(&self) -> VersionResult<()> {
        self.create_table()
            .map_err(|e| VersionError::from(e.context(format!("creating table '{}'", self.table))))
    }

    fn rollback(&self) -> VersionResult<()> {
        Err(VersionError::RollbackUnsupported {
            version: self.number,
        })
    }
}

/// A migration script run against the shared connection.
pub struct SqlScriptVersion {
    backend: Arc<DuckDbBackend>,
    script: MigrationScript,
}

impl SqlScriptVersion {
    pub fn new(backend: Arc<DuckDbBackend>, script: MigrationScript) -> Self {
        Self { backend, script }
    }
}

impl Version for SqlScriptVersion {
    fn number(&self) -> i64 {
        self.script.number
    }

    fn upgrade(&self) -> VersionResult<()> {
        self.backend
            .execute_batch(&self.script.up_sql)
            .map_err(|e| VersionError::from(e.context(self.script.up_path.display().to_string())))
    }

    fn rollback(&self) -> VersionResult<()> {
        let Some(down_sql) = &self.script.down_sql else {
            return Err(VersionError::RollbackUnsupported {
                version: self.script.number,
            });
        };
        self.backend
            .execute_batch(down_sql)
            .map_err(|e| VersionError::from(e.context(format!("rollback of {}", self.script.name))))
    }
}

/// The bootstrap change followed by one version per script.
///
/// Fails if a script reuses the bootstrap number.
pub fn build_versions(
    backend: &Arc<DuckDbBackend>,
    table: &str,
    bootstrap_version: i64,
    scripts: Vec<MigrationScript>,
) -> CoreResult<Vec<Box<dyn Version>>> {
    if let Some(clash) = scripts.iter().find(|s| s.number == bootstrap_version) {
        return Err(CoreError::DuplicateVersion {
            version: bootstrap_version,
            first: format!("version table bootstrap ({table})"),
            second: clash.up_path.display().to_string(),
        });
    }
    let mut versions: Vec<Box<dyn Version>> = Vec::with_capacity(scripts.len() + 1);
    versions.push(Box::new(VersionTableBootstrap::new(
        Arc::clone(backend),
        table,
        bootstrap_version,
    )));
    for script in scripts {
        versions.push(Box::new(SqlScriptVersion::new(Arc::clone(backend), script)));
    }
    Ok(versions)
}

#[cfg(test)]
#[path = "versions_test.rs"]
mod tests;
