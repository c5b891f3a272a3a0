//! Post-write memory eviction hook.

use crate::errors::StorageError;
use crate::models::{Measure, MeasureRecord};

/// Receives every successfully written measure together with the record
/// that was stored, and may drop heavy fields from the in-memory measure.
///
/// `on_evict` is called synchronously, exactly once per successful write,
/// after the write committed.
pub trait MemoryOptimizer {
    fn on_evict(&mut self, measure: &mut Measure, record: &MeasureRecord);

    /// Bring evicted fields back into memory.
    fn reload(&mut self, measure: &mut Measure) -> Result<(), StorageError>;
}

/// Keeps everything in memory.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopOptimizer;

impl MemoryOptimizer for NoopOptimizer {
    fn on_evict(&mut self, _measure: &mut Measure, _record: &MeasureRecord) {}

    fn reload(&mut self, _measure: &mut Measure) -> Result<(), StorageError> {
        Ok(())
    }
}
