//! Listener wrapping each change in its own DuckDB transaction.
//!
//! The change's SQL and the version row it records run on the backend's
//! single connection between `BEGIN` and `COMMIT`, so a failed change leaves
//! neither behind.

use crate::duckdb::DuckDbBackend;
use crate::error::{DbError, DbResult};
use std::sync::Arc;
use vs_core::{Event, EventType, Listener, VersionError, VersionResult};

/// Opens a transaction on before-change, commits on after-change and rolls
/// back on error-during-change.
pub struct TransactionalListener {
    backend: Arc<DuckDbBackend>,
    /// Version whose transaction is currently open.
    open: Option<i64>,
}

impl TransactionalListener {
    pub fn new(backend: Arc<DuckDbBackend>) -> Self {
        Self {
            backend,
            open: None,
        }
    }

    /// Whether a transaction is currently open.
    pub fn in_transaction(&self) -> bool {
        self.open.is_some()
    }

    fn begin(&mut self, version: i64) -> DbResult<()> {
        if let Some(open) = self.open {
            return Err(DbError::TransactionError(format!(
                "cannot begin for version {version}: version {open} still open"
            )));
        }
        self.backend
            .execute_batch("BEGIN TRANSACTION")
            .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;
        self.open = Some(version);
        Ok(())
    }

    fn commit(&mut self) -> DbResult<()> {
        let version = self.take_open("commit")?;
        if let Err(commit_err) = self.backend.execute_batch("COMMIT") {
            let _ = self.backend.execute_batch("ROLLBACK");
            return Err(DbError::TransactionError(format!(
                "COMMIT for version {version} failed: {commit_err}"
            )));
        }
        Ok(())
    }

    fn rollback(&mut self) -> DbResult<()> {
        let version = self.take_open("rollback")?;
        self.backend.execute_batch("ROLLBACK").map_err(|e| {
            DbError::TransactionError(format!("ROLLBACK for version {version} failed: {e}"))
        })
    }

    fn take_open(&mut self, action: &str) -> DbResult<i64> {
        self.open
            .take()
            .ok_or_else(|| DbError::TransactionError(format!("no open transaction to {action}")))
    }

    /// Roll back a transaction left open by an aborted sync.
    fn release_abandoned(&mut self) {
        if let Some(version) = self.open {
            log::warn!("rolling back transaction left open for version {version}");
            if let Err(e) = self.rollback() {
                log::warn!("{e}");
            }
        }
    }
}

impl Listener for TransactionalListener {
    fn on(&mut self, event: &Event<'_>) -> VersionResult<()> {
        let result = match event.kind {
            EventType::Start => {
                self.release_abandoned();
                Ok(())
            }
            EventType::BeforeChange => {
                let version = event.version_number().ok_or_else(|| {
                    VersionError::Transaction("before-change without a version".to_string())
                })?;
                self.begin(version)
            }
            EventType::AfterChange => self.commit(),
            EventType::ErrorDuringChange => self.rollback(),
            _ => Ok(()),
        };
        result.map_err(VersionError::from)
    }
}

impl Drop for TransactionalListener {
    fn drop(&mut self) {
        self.release_abandoned();
    }
}

#[cfg(test)]
#[path = "transactional_test.rs"]
mod tests;
