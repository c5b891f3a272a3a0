//! Shared handle on a measure.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use super::Measure;

/// A measure shared between the analysis code that computed it and the
/// persister's write buffer.
///
/// A delayed measure stays referenced by the buffer until the next flush,
/// so the id assigned and the payload evicted during the flush land on the
/// caller's measure. Single-threaded: one handle set per batch.
#[derive(Debug, Clone)]
pub struct MeasureHandle(Rc<RefCell<Measure>>);

impl MeasureHandle {
    pub fn new(measure: Measure) -> Self {
        Self(Rc::new(RefCell::new(measure)))
    }

    /// # Panics
    /// If the measure is currently borrowed mutably.
    pub fn borrow(&self) -> Ref<'_, Measure> {
        self.0.borrow()
    }

    /// # Panics
    /// If the measure is currently borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, Measure> {
        self.0.borrow_mut()
    }

    /// Both handles refer to the same measure.
    pub fn same_measure(&self, other: &MeasureHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl From<Measure> for MeasureHandle {
    fn from(measure: Measure) -> Self {
        Self::new(measure)
    }
}
