//! Lifecycle events emitted during a sync.

use crate::error::VersionError;
use crate::version::Version;
use std::fmt;

/// Kind of lifecycle moment. The string forms are a stable contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Start,
    End,
    BeforeSync,
    AfterSync,
    BeforeChange,
    AfterChange,
    ErrorDuringChange,
    Error,
}

impl EventType {
    /// Every event type, in declaration order.
    pub const ALL: [EventType; 8] = [
        EventType::Start,
        EventType::End,
        EventType::BeforeSync,
        EventType::AfterSync,
        EventType::BeforeChange,
        EventType::AfterChange,
        EventType::ErrorDuringChange,
        EventType::Error,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Start => "start",
            EventType::End => "end",
            EventType::BeforeSync => "before-sync",
            EventType::AfterSync => "after-sync",
            EventType::BeforeChange => "before-change",
            EventType::AfterChange => "after-change",
            EventType::ErrorDuringChange => "error-during-change",
            EventType::Error => "error",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One lifecycle moment, borrowed from the versioner for the duration of a
/// listener call.
#[derive(Clone, Copy)]
pub struct Event<'a> {
    pub kind: EventType,
    /// Present for per-change events only.
    pub version: Option<&'a dyn Version>,
    /// Present for error events only.
    pub error: Option<&'a VersionError>,
}

impl<'a> Event<'a> {
    pub fn new(kind: EventType) -> Self {
        Self {
            kind,
            version: None,
            error: None,
        }
    }

    pub fn for_version(kind: EventType, version: &'a dyn Version) -> Self {
        Self {
            kind,
            version: Some(version),
            error: None,
        }
    }

    pub fn with_error(mut self, error: &'a VersionError) -> Self {
        self.error = Some(error);
        self
    }

    /// Number of the version carried by this event.
    pub fn version_number(&self) -> Option<i64> {
        self.version.map(|v| v.number())
    }
}

impl fmt::Debug for Event<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("kind", &self.kind)
            .field("version", &self.version_number())
            .field("error", &self.error)
            .finish()
    }
}
