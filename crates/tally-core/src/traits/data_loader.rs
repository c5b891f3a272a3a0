use std::sync::Arc;

use crate::errors::StorageError;

/// Reads spill-over text back from storage.
pub trait MeasureDataLoader {
    fn load_data(&self, data_id: i64) -> Result<Option<String>, StorageError>;
}

impl<T: MeasureDataLoader + ?Sized> MeasureDataLoader for &T {
    fn load_data(&self, data_id: i64) -> Result<Option<String>, StorageError> {
        (**self).load_data(data_id)
    }
}

impl<T: MeasureDataLoader + ?Sized> MeasureDataLoader for Arc<T> {
    fn load_data(&self, data_id: i64) -> Result<Option<String>, StorageError> {
        (**self).load_data(data_id)
    }
}
