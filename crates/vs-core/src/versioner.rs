//! The sync engine.
//!
//! [`Versioner`] reads the current version from its applier, selects the
//! versions lying strictly between current and target, applies them one at a
//! time, and notifies its listener around every step:
//!
//! ```text
//! start
//!   [current == target]  end
//!   before-sync
//!     before-change(v)  upgrade|rollback  sync_version  after-change(v)
//!     ...
//!   after-sync
//! end
//! ```
//!
//! Failures are terminal. Versions applied before the failure stay applied
//! and recorded.

use crate::error::{Direction, SyncError, SyncResult, VersionError, VersionResult};
use crate::event::{Event, EventType};
use crate::listener::{Listener, NoOpListener};
use crate::version::{Version, VersionApplier};

/// What a sync from `current` to `target` would do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPlan {
    pub current: i64,
    pub target: i64,
    pub direction: Direction,
    /// Version numbers in application order.
    pub versions: Vec<i64>,
}

impl SyncPlan {
    /// True when current and target already match.
    pub fn is_noop(&self) -> bool {
        self.current == self.target
    }
}

/// Brings a structure to a target version using a set of versioned changes.
pub struct Versioner<A> {
    applier: A,
    versions: Vec<Box<dyn Version>>,
    listener: Box<dyn Listener>,
}

impl<A: VersionApplier> Versioner<A> {
    /// Create a versioner that notifies nobody.
    pub fn new(applier: A, versions: Vec<Box<dyn Version>>) -> Self {
        Self {
            applier,
            versions,
            listener: Box::new(NoOpListener),
        }
    }

    pub fn with_listener(mut self, listener: impl Listener + 'static) -> Self {
        self.set_listener(listener);
        self
    }

    pub fn set_listener(&mut self, listener: impl Listener + 'static) {
        self.listener = Box::new(listener);
    }

    pub fn applier(&self) -> &A {
        &self.applier
    }

    /// Current structure version, read without applying anything.
    pub fn current_version(&self) -> VersionResult<i64> {
        self.applier.current_version()
    }

    /// Highest held version number, or 0 without versions.
    pub fn last_version(&self) -> i64 {
        self.versions
            .iter()
            .map(|version| version.number())
            .fold(0, i64::max)
    }

    /// Sync to [`last_version`](Self::last_version).
    pub fn upgrade_to_last(&mut self) -> SyncResult<()> {
        self.sync(self.last_version())
    }

    /// Describe what a sync to `target` would apply, without applying it.
    pub fn plan(&self, target: i64) -> VersionResult<SyncPlan> {
        let current = self.applier.current_version()?;
        let mut ordered: Vec<&dyn Version> = self.versions.iter().map(|v| &**v).collect();
        ordered.sort_by_key(|v| v.number());

        let direction = direction_of(current, target);
        let versions = if current == target {
            Vec::new()
        } else {
            select(&ordered, direction, current, target)
                .iter()
                .map(|v| v.number())
                .collect()
        };
        Ok(SyncPlan {
            current,
            target,
            direction,
            versions,
        })
    }

    /// Move the structure from its current version to `target`.
    pub fn sync(&mut self, target: i64) -> SyncResult<()> {
        emit(self.listener.as_mut(), Event::new(EventType::Start))?;

        let current = match self.applier.current_version() {
            Ok(current) => current,
            Err(source) => {
                let listener = report(
                    self.listener.as_mut(),
                    Event::new(EventType::Error).with_error(&source),
                );
                return Err(SyncError::Read { source, listener });
            }
        };

        if current == target {
            log::trace!("structure already at version {target}");
            return emit(self.listener.as_mut(), Event::new(EventType::End));
        }

        self.versions.sort_by_key(|v| v.number());

        let direction = direction_of(current, target);
        let ordered: Vec<&dyn Version> = self.versions.iter().map(|v| &**v).collect();
        let to_apply = select(&ordered, direction, current, target);
        log::trace!(
            "{direction} from {current} to {target}: {} version(s) selected",
            to_apply.len()
        );

        emit(self.listener.as_mut(), Event::new(EventType::BeforeSync))?;
        for version in to_apply {
            emit(
                self.listener.as_mut(),
                Event::for_version(EventType::BeforeChange, version),
            )?;

            let applied = match direction {
                Direction::Upgrade => version.upgrade(),
                Direction::Rollback => version.rollback(),
            };
            if let Err(source) = applied {
                let listener = report_change(self.listener.as_mut(), version, &source);
                return Err(SyncError::Change {
                    direction,
                    version: version.number(),
                    source,
                    listener,
                });
            }

            if let Err(source) = self.applier.sync_version(version.number()) {
                let listener = report_change(self.listener.as_mut(), version, &source);
                return Err(SyncError::Persist {
                    version: version.number(),
                    source,
                    listener,
                });
            }

            emit(
                self.listener.as_mut(),
                Event::for_version(EventType::AfterChange, version),
            )?;
        }
        emit(self.listener.as_mut(), Event::new(EventType::AfterSync))?;

        emit(self.listener.as_mut(), Event::new(EventType::End))
    }
}

/// Rollback iff the target lies below the current version.
fn direction_of(current: i64, target: i64) -> Direction {
    if target < current {
        Direction::Rollback
    } else {
        Direction::Upgrade
    }
}

/// Versions strictly between `current` and `target`, in application order.
///
/// `ordered` must be sorted ascending. Rollbacks come out most recent first.
fn select<'a>(
    ordered: &[&'a dyn Version],
    direction: Direction,
    current: i64,
    target: i64,
) -> Vec<&'a dyn Version> {
    match direction {
        Direction::Upgrade => ordered
            .iter()
            .copied()
            .filter(|v| v.number() > current && v.number() < target)
            .collect(),
        Direction::Rollback => ordered
            .iter()
            .rev()
            .copied()
            .filter(|v| v.number() < current && v.number() > target)
            .collect(),
    }
}

fn emit(listener: &mut dyn Listener, event: Event<'_>) -> SyncResult<()> {
    listener
        .on(&event)
        .map_err(|source| SyncError::Listener {
            event: event.kind,
            source,
        })
}

/// Notify an error event, keeping the listener's own failure if it has one.
fn report(listener: &mut dyn Listener, event: Event<'_>) -> Option<Box<VersionError>> {
    listener.on(&event).err().map(Box::new)
}

fn report_change(
    listener: &mut dyn Listener,
    version: &dyn Version,
    error: &VersionError,
) -> Option<Box<VersionError>> {
    report(
        listener,
        Event::for_version(EventType::ErrorDuringChange, version).with_error(error),
    )
}

#[cfg(test)]
#[path = "versioner_test.rs"]
mod tests;
