//! Memory optimizer that drops stored text payloads from data metrics.

use rustc_hash::FxHashMap;
use tally_core::errors::StorageError;
use tally_core::models::{Measure, MeasureId, MeasureRecord};
use tally_core::traits::{MeasureDataLoader, MemoryOptimizer};

/// Evicts the text of `DATA`/`DISTRIB` measures once it sits in a
/// spill-over row, and reloads it on demand through `loader`.
pub struct DataEvictingOptimizer<L> {
    loader: L,
    evicted: FxHashMap<MeasureId, i64>,
}

impl<L: MeasureDataLoader> DataEvictingOptimizer<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            evicted: FxHashMap::default(),
        }
    }

    /// Spill-over row id of an evicted measure.
    pub fn evicted_data_id(&self, id: MeasureId) -> Option<i64> {
        self.evicted.get(&id).copied()
    }

    pub fn evicted_count(&self) -> usize {
        self.evicted.len()
    }
}

impl<L: MeasureDataLoader> MemoryOptimizer for DataEvictingOptimizer<L> {
    fn on_evict(&mut self, measure: &mut Measure, record: &MeasureRecord) {
        let Some(id) = measure.id() else {
            return;
        };
        match record.data_id() {
            Some(data_id) if measure.metric.is_data_type() => {
                measure.take_data();
                self.evicted.insert(id, data_id);
                tracing::trace!(measure_id = %id, data_id, "measure data evicted");
            }
            // Text went back inline on an update: nothing left to reload.
            _ => {
                self.evicted.remove(&id);
            }
        }
    }

    fn reload(&mut self, measure: &mut Measure) -> Result<(), StorageError> {
        if measure.has_data() {
            return Ok(());
        }
        let Some(data_id) = measure.id().and_then(|id| self.evicted_data_id(id)) else {
            return Ok(());
        };
        match self.loader.load_data(data_id)? {
            Some(data) => {
                measure.data = Some(data);
                Ok(())
            }
            None => Err(StorageError::NotFound {
                entity: "measure data",
                id: data_id.to_string(),
            }),
        }
    }
}
