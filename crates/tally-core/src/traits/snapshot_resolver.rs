use std::sync::Arc;

use crate::errors::StorageError;
use crate::models::{Component, SnapshotId};

/// Resolves a component to its snapshot for the current analysis run.
pub trait SnapshotResolver {
    /// `Ok(None)` means the component has no snapshot in this run.
    fn snapshot_id(&self, component: &Component) -> Result<Option<SnapshotId>, StorageError>;
}

impl<T: SnapshotResolver + ?Sized> SnapshotResolver for &T {
    fn snapshot_id(&self, component: &Component) -> Result<Option<SnapshotId>, StorageError> {
        (**self).snapshot_id(component)
    }
}

impl<T: SnapshotResolver + ?Sized> SnapshotResolver for Arc<T> {
    fn snapshot_id(&self, component: &Component) -> Result<Option<SnapshotId>, StorageError> {
        (**self).snapshot_id(component)
    }
}
