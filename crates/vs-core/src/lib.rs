//! vs-core - Core library for Versync
//!
//! This crate provides the version sync engine: the [`Version`] and
//! [`VersionApplier`] collaborator traits, lifecycle [`Listener`]s, the
//! [`Versioner`] that orders and applies changes, plus project configuration
//! and migration script discovery shared by the backend and CLI crates.

pub mod config;
pub mod error;
pub mod event;
pub mod listener;
pub mod script;
pub mod version;
pub mod versioner;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::Config;
pub use error::{
    BoxError, CoreError, CoreResult, Direction, SyncError, SyncResult, VersionError,
    VersionResult,
};
pub use event::{Event, EventType};
pub use listener::{BroadcastListener, Listener, LoggingListener, NoOpListener};
pub use script::{discover_scripts, MigrationScript};
pub use version::{Version, VersionApplier, UNVERSIONED};
pub use versioner::{SyncPlan, Versioner};
