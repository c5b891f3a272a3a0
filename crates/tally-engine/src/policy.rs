//! Admission policy: which computed measures are worth a storage row.

use tally_core::models::{Component, Measure};

/// Decide whether `measure` on `component` should reach storage.
///
/// Rules, first match wins:
/// 1. memory-only measures never do;
/// 2. above file level everything does;
/// 3. at file level, metrics without an optimized best value always do;
/// 4. otherwise the measure is kept only when it is database-only, carries
///    text, has a value other than the best value, or has a negative
///    variation-1. A measure with neither value nor text is dropped like a
///    best-value one.
pub fn should_persist(component: &Component, measure: &Measure) -> bool {
    let mode = measure.persistence_mode;
    if !mode.use_database() {
        return false;
    }
    if !component.is_file_level() {
        return true;
    }
    let Some(best_value) = measure.metric.optimized_best_value() else {
        return true;
    };

    !mode.use_memory()
        || measure.has_data()
        || measure.value.is_some_and(|v| v != best_value)
        || measure.variation1().is_some_and(|v| v < 0.0)
}

/// `should_persist` plus the optional empty-measure skip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdmissionPolicy {
    pub skip_empty_measures: bool,
}

impl AdmissionPolicy {
    pub fn new(skip_empty_measures: bool) -> Self {
        Self {
            skip_empty_measures,
        }
    }

    pub fn admits(&self, component: &Component, measure: &Measure) -> bool {
        if self.skip_empty_measures && measure.is_empty() {
            return false;
        }
        should_persist(component, measure)
    }
}
