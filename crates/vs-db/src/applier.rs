//! Version tracking table applier.
//!
//! One row is appended per applied change; the current version is the most
//! recently written row.

use crate::duckdb::DuckDbBackend;
use crate::error::{DbError, DbResult};
use std::sync::Arc;
use vs_core::{VersionApplier, VersionError, VersionResult, UNVERSIONED};

/// Stores versions as rows of `(id, version, modification_time)` in a DuckDB table
pub struct TableVersionApplier {
    backend: Arc<DuckDbBackend>,
    table: String,
}

impl TableVersionApplier {
    pub fn new(backend: Arc<DuckDbBackend>, table: impl Into<String>) -> Self {
        Self {
            backend,
            table: table.into(),
        }
    }

    fn read_current(&self) -> DbResult<i64> {
        let conn = self.backend.lock()?;
        let sql = format!(
            "SELECT version FROM {} ORDER BY modification_time DESC, rowid DESC LIMIT 1",
            self.table
        );
        match conn.query_row(&sql, [], |row| row.get::<_, i64>(0)) {
            Ok(version) => Ok(version),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(UNVERSIONED),
            Err(e) => match DbError::from(e) {
                DbError::TableNotFound(_) => Ok(UNVERSIONED),
                other => Err(other),
            },
        }
    }

    fn insert_version(&self, version: i64) -> DbResult<()> {
        let conn = self.backend.lock()?;
        let sql = format!(
            "INSERT INTO {} (id, version, modification_time) VALUES (CAST(? AS UUID), ?, now())",
            self.table
        );
        conn.execute(
            &sql,
            duckdb::params![uuid::Uuid::new_v4().to_string(), version],
        )?;
        Ok(())
    }
}

impl VersionApplier for TableVersionApplier {
    fn current_version(&self) -> VersionResult<i64> {
        self.read_current()
            .map_err(|e| VersionError::from(e.context("could not get current version")))
    }

    fn sync_version(&self, version: i64) -> VersionResult<()> {
        log::trace!("recording version {version} in {}", self.table);
        self.insert_version(version)
            .map_err(|e| {
                VersionError::from(e.context(format!("could not insert version {version}")))
            })
    }
}

#[cfg(test)]
#[path = "applier_test.rs"]
mod tests;
