//! Error types for vs-core

use crate::event::EventType;
use std::fmt;
use thiserror::Error;

/// Boxed error used to carry backend failures across the collaborator seam.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Project-level errors: configuration and script discovery.
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Two migration scripts share a version number
    #[error("[E004] Duplicate version {version}: {first} and {second}")]
    DuplicateVersion {
        version: i64,
        first: String,
        second: String,
    },

    /// E005: A rollback script has no matching upgrade script
    #[error("[E005] Rollback script without upgrade script: {path}")]
    OrphanRollback { path: String },

    /// E006: IO error with file path context
    #[error("[E006] IO error at {path}: {source}")]
    IoWithPath {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<serde_yaml::Error> for CoreError {
    fn from(err: serde_yaml::Error) -> Self {
        CoreError::ConfigParseError {
            message: err.to_string(),
        }
    }
}

/// Error returned by collaborators: version actions, appliers, and listeners.
#[derive(Error, Debug)]
pub enum VersionError {
    /// The version has no meaningful inverse (V001)
    #[error("[V001] Rollback not supported for version {version}")]
    RollbackUnsupported { version: i64 },

    /// The change itself failed (V002)
    #[error("[V002] Change failed: {0}")]
    Change(String),

    /// Reading or recording the stored version failed (V003)
    #[error("[V003] Version storage failed: {0}")]
    Storage(String),

    /// Opening, committing or rolling back a transactional scope failed (V004)
    #[error("[V004] Transaction failed: {0}")]
    Transaction(String),

    /// Any other backend failure, source chain preserved (V005)
    #[error("[V005] {0}")]
    Other(#[source] BoxError),
}

/// Result type alias for VersionError
pub type VersionResult<T> = Result<T, VersionError>;

/// Direction of a sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Upgrade,
    Rollback,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Upgrade => write!(f, "upgrade"),
            Direction::Rollback => write!(f, "rollback"),
        }
    }
}

/// The single structured error returned by a failed sync.
///
/// `Read`, `Change` and `Persist` keep the listener error raised while the
/// failure was being reported, if any, next to the original cause.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Current version could not be read (S001)
    #[error("[S001] Could not sync{}: {source}", event_note(.listener))]
    Read {
        #[source]
        source: VersionError,
        listener: Option<Box<VersionError>>,
    },

    /// A version's upgrade or rollback action failed (S002)
    #[error("[S002] {direction} to version {version}{}: {source}", event_note(.listener))]
    Change {
        direction: Direction,
        version: i64,
        #[source]
        source: VersionError,
        listener: Option<Box<VersionError>>,
    },

    /// The new version could not be recorded after a successful action (S003)
    #[error("[S003] Sync version to {version}{}: {source}", event_note(.listener))]
    Persist {
        version: i64,
        #[source]
        source: VersionError,
        listener: Option<Box<VersionError>>,
    },

    /// A listener vetoed the sync (S004)
    #[error("[S004] Event {event}: {source}")]
    Listener {
        event: EventType,
        #[source]
        source: VersionError,
    },
}

fn event_note(listener: &Option<Box<VersionError>>) -> String {
    match listener {
        Some(err) => format!(" (event error: {err})"),
        None => String::new(),
    }
}

impl SyncError {
    /// Version whose change triggered the failure, if any.
    pub fn version(&self) -> Option<i64> {
        match self {
            SyncError::Change { version, .. } | SyncError::Persist { version, .. } => {
                Some(*version)
            }
            SyncError::Read { .. } | SyncError::Listener { .. } => None,
        }
    }

    /// Event type whose listener vetoed the sync.
    pub fn event(&self) -> Option<EventType> {
        match self {
            SyncError::Listener { event, .. } => Some(*event),
            _ => None,
        }
    }

    /// Listener failure, either the veto itself or the one raised while
    /// reporting another error.
    pub fn listener_error(&self) -> Option<&VersionError> {
        match self {
            SyncError::Listener { source, .. } => Some(source),
            SyncError::Read { listener, .. }
            | SyncError::Change { listener, .. }
            | SyncError::Persist { listener, .. } => listener.as_deref(),
        }
    }

    /// Root cause reported by the collaborator that failed.
    pub fn cause(&self) -> &VersionError {
        match self {
            SyncError::Read { source, .. }
            | SyncError::Change { source, .. }
            | SyncError::Persist { source, .. }
            | SyncError::Listener { source, .. } => source,
        }
    }
}

/// Result type alias for SyncError
pub type SyncResult<T> = Result<T, SyncError>;
