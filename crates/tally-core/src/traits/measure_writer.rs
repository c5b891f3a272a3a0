use std::sync::Arc;

use crate::errors::StorageError;
use crate::models::{MeasureId, MeasureRecord};

/// Durable storage writer for measure records.
///
/// Both operations write the measure row and its spill-over text row (if
/// any) together, and fill in `record.data.id` for a newly written
/// spill-over row.
pub trait MeasureWriter {
    /// Insert a new row and return its id. `record.id` is set on success.
    fn insert(&self, record: &mut MeasureRecord) -> Result<MeasureId, StorageError>;

    /// Overwrite the row identified by `record.id`.
    fn update(&self, record: &mut MeasureRecord) -> Result<(), StorageError>;
}

impl<T: MeasureWriter + ?Sized> MeasureWriter for &T {
    fn insert(&self, record: &mut MeasureRecord) -> Result<MeasureId, StorageError> {
        (**self).insert(record)
    }

    fn update(&self, record: &mut MeasureRecord) -> Result<(), StorageError> {
        (**self).update(record)
    }
}

impl<T: MeasureWriter + ?Sized> MeasureWriter for Arc<T> {
    fn insert(&self, record: &mut MeasureRecord) -> Result<MeasureId, StorageError> {
        (**self).insert(record)
    }

    fn update(&self, record: &mut MeasureRecord) -> Result<(), StorageError> {
        (**self).update(record)
    }
}
