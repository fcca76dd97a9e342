//! vs-db - DuckDB backend for Versync
//!
//! Provides the reference collaborators for the vs-core engine: a
//! table-backed [`VersionApplier`](vs_core::VersionApplier), the change that
//! bootstraps that table, SQL script versions, and a listener that runs every
//! change inside its own transaction.

pub mod applier;
pub mod duckdb;
pub mod error;
pub mod transactional;
pub mod versions;

pub use crate::duckdb::DuckDbBackend;
pub use applier::TableVersionApplier;
pub use error::{DbError, DbResult};
pub use transactional::TransactionalListener;
pub use versions::{build_versions, SqlScriptVersion, VersionTableBootstrap};
