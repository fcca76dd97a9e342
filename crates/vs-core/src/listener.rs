//! Observers notified at each lifecycle point of a sync.
//!
//! A listener vetoes a sync by returning an error: the versioner stops at
//! once and reports which event was refused.

use crate::error::VersionResult;
use crate::event::{Event, EventType};

/// Reacts to sync lifecycle events.
pub trait Listener {
    /// Handle one event. Any error aborts the whole sync.
    fn on(&mut self, event: &Event<'_>) -> VersionResult<()>;
}

impl<L: Listener + ?Sized> Listener for Box<L> {
    fn on(&mut self, event: &Event<'_>) -> VersionResult<()> {
        (**self).on(event)
    }
}

/// Listener that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpListener;

impl Listener for NoOpListener {
    fn on(&mut self, _event: &Event<'_>) -> VersionResult<()> {
        Ok(())
    }
}

/// Forwards each event to several listeners in order.
///
/// Stops at the first failure; later listeners do not see that event.
#[derive(Default)]
pub struct BroadcastListener {
    listeners: Vec<Box<dyn Listener>>,
}

impl BroadcastListener {
    pub fn new(listeners: Vec<Box<dyn Listener>>) -> Self {
        Self { listeners }
    }

    /// Append a listener to the end of the broadcast order.
    pub fn push(&mut self, listener: impl Listener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn with(mut self, listener: impl Listener + 'static) -> Self {
        self.push(listener);
        self
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl Listener for BroadcastListener {
    fn on(&mut self, event: &Event<'_>) -> VersionResult<()> {
        for listener in &mut self.listeners {
            listener.on(event)?;
        }
        Ok(())
    }
}

/// Logs sync progress through the `log` facade.
///
/// Only before-sync, before-change, after-change and after-sync are logged.
#[derive(Debug, Clone, Copy)]
pub struct LoggingListener {
    level: log::Level,
}

impl LoggingListener {
    /// Log at debug level.
    pub fn new() -> Self {
        Self {
            level: log::Level::Debug,
        }
    }

    pub fn with_level(level: log::Level) -> Self {
        Self { level }
    }

    pub fn level(&self) -> log::Level {
        self.level
    }
}

impl Default for LoggingListener {
    fn default() -> Self {
        Self::new()
    }
}

impl Listener for LoggingListener {
    fn on(&mut self, event: &Event<'_>) -> VersionResult<()> {
        match event.kind {
            EventType::BeforeSync => log::log!(self.level, "starting syncing process"),
            EventType::BeforeChange => {
                if let Some(version) = event.version_number() {
                    log::log!(self.level, "applying version {version}");
                }
            }
            EventType::AfterChange => {
                if let Some(version) = event.version_number() {
                    log::log!(self.level, "version {version} applied");
                }
            }
            EventType::AfterSync => log::log!(self.level, "end of syncing process"),
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "listener_test.rs"]
mod tests;
