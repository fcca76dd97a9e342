//! Shared test utilities for vs-core
//!
//! Mocks append to one shared call log so tests can assert the exact
//! interleaving of events, actions and persistence calls.

use crate::error::{VersionError, VersionResult};
use crate::event::{Event, EventType};
use crate::listener::Listener;
use crate::version::{Version, VersionApplier};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub(crate) type CallLog = Rc<RefCell<Vec<String>>>;

pub(crate) fn call_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Snapshot of the log entries.
pub(crate) fn entries(log: &CallLog) -> Vec<String> {
    log.borrow().clone()
}

/// Snapshot of the log entries starting with `prefix`.
pub(crate) fn entries_with(log: &CallLog, prefix: &str) -> Vec<String> {
    log.borrow()
        .iter()
        .filter(|e| e.starts_with(prefix))
        .cloned()
        .collect()
}

pub(crate) struct MockVersion {
    number: i64,
    log: CallLog,
    fail_upgrade: bool,
    rollback_unsupported: bool,
}

impl MockVersion {
    pub(crate) fn new(number: i64, log: &CallLog) -> Self {
        Self {
            number,
            log: log.clone(),
            fail_upgrade: false,
            rollback_unsupported: false,
        }
    }

    pub(crate) fn failing_upgrade(mut self) -> Self {
        self.fail_upgrade = true;
        self
    }

    pub(crate) fn without_rollback(mut self) -> Self {
        self.rollback_unsupported = true;
        self
    }
}

impl Version for MockVersion {
    fn number(&self) -> i64 {
        self.number
    }

    fn upgrade(&self) -> VersionResult<()> {
        self.log.borrow_mut().push(format!("upgrade {}", self.number));
        if self.fail_upgrade {
            return Err(VersionError::Change(format!("boom at {}", self.number)));
        }
        Ok(())
    }

    fn rollback(&self) -> VersionResult<()> {
        self.log.borrow_mut().push(format!("rollback {}", self.number));
        if self.rollback_unsupported {
            return Err(VersionError::RollbackUnsupported {
                version: self.number,
            });
        }
        Ok(())
    }
}

/// Boxed mock versions for the given numbers.
pub(crate) fn versions(numbers: &[i64], log: &CallLog) -> Vec<Box<dyn Version>> {
    numbers
        .iter()
        .map(|&n| Box::new(MockVersion::new(n, log)) as Box<dyn Version>)
        .collect()
}

pub(crate) struct MockApplier {
    current: Cell<i64>,
    log: CallLog,
    fail_read: bool,
    fail_sync_on: Option<i64>,
}

impl MockApplier {
    pub(crate) fn at(current: i64, log: &CallLog) -> Self {
        Self {
            current: Cell::new(current),
            log: log.clone(),
            fail_read: false,
            fail_sync_on: None,
        }
    }

    pub(crate) fn failing_read(mut self) -> Self {
        self.fail_read = true;
        self
    }

    pub(crate) fn failing_sync_on(mut self, version: i64) -> Self {
        self.fail_sync_on = Some(version);
        self
    }

    pub(crate) fn stored(&self) -> i64 {
        self.current.get()
    }
}

impl VersionApplier for MockApplier {
    fn current_version(&self) -> VersionResult<i64> {
        self.log.borrow_mut().push("current".to_string());
        if self.fail_read {
            return Err(VersionError::Storage("version table unreadable".to_string()));
        }
        Ok(self.current.get())
    }

    fn sync_version(&self, version: i64) -> VersionResult<()> {
        self.log.borrow_mut().push(format!("sync {version}"));
        if self.fail_sync_on == Some(version) {
            return Err(VersionError::Storage(format!("cannot record {version}")));
        }
        self.current.set(version);
        Ok(())
    }
}

/// Records every event it sees, optionally refusing one event type.
pub(crate) struct RecordingListener {
    name: &'static str,
    log: CallLog,
    fail_on: Option<EventType>,
}

impl RecordingListener {
    pub(crate) fn new(log: &CallLog) -> Self {
        Self::named("event", log)
    }

    pub(crate) fn named(name: &'static str, log: &CallLog) -> Self {
        Self {
            name,
            log: log.clone(),
            fail_on: None,
        }
    }

    pub(crate) fn failing_on(mut self, kind: EventType) -> Self {
        self.fail_on = Some(kind);
        self
    }
}

impl Listener for RecordingListener {
    fn on(&mut self, event: &Event<'_>) -> VersionResult<()> {
        let entry = match event.version_number() {
            Some(n) => format!("{} {} {}", self.name, event.kind, n),
            None => format!("{} {}", self.name, event.kind),
        };
        self.log.borrow_mut().push(entry);
        if self.fail_on == Some(event.kind) {
            return Err(VersionError::Change(format!("{} refused {}", self.name, event.kind)));
        }
        Ok(())
    }
}
