//! Collaborator contracts: versioned changes and the structure they apply to.

use crate::error::VersionResult;
use std::sync::Arc;

/// Version number reported by an applier whose structure was never versioned.
pub const UNVERSIONED: i64 = -1;

/// A numbered change that can move a structure forward or back.
///
/// Numbers need not be contiguous. Higher means more recent, and 0 is the
/// empty baseline. Numbers should be unique within one versioner.
pub trait Version {
    /// Ordering key of this change. Must be stable and side-effect free.
    fn number(&self) -> i64;

    /// Apply the forward change.
    fn upgrade(&self) -> VersionResult<()>;

    /// Apply the inverse change.
    ///
    /// Changes without a meaningful inverse return
    /// [`VersionError::RollbackUnsupported`](crate::VersionError::RollbackUnsupported).
    fn rollback(&self) -> VersionResult<()>;
}

/// The structure being versioned, owner of the stored "current version".
pub trait VersionApplier {
    /// Currently recorded version, or [`UNVERSIONED`] if none was ever recorded.
    fn current_version(&self) -> VersionResult<i64>;

    /// Durably record `version` as the current version.
    fn sync_version(&self, version: i64) -> VersionResult<()>;
}

impl<T: VersionApplier + ?Sized> VersionApplier for &T {
    fn current_version(&self) -> VersionResult<i64> {
        (**self).current_version()
    }

    fn sync_version(&self, version: i64) -> VersionResult<()> {
        (**self).sync_version(version)
    }
}

impl<T: VersionApplier + ?Sized> VersionApplier for Arc<T> {
    fn current_version(&self) -> VersionResult<i64> {
        (**self).current_version()
    }

    fn sync_version(&self, version: i64) -> VersionResult<()> {
        (**self).sync_version(version)
    }
}

impl<T: VersionApplier + ?Sized> VersionApplier for Box<T> {
    fn current_version(&self) -> VersionResult<i64> {
        (**self).current_version()
    }

    fn sync_version(&self, version: i64) -> VersionResult<()> {
        (**self).sync_version(version)
    }
}
