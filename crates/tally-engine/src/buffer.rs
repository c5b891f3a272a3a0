//! Write buffer for delayed mode.
//!
//! Pending measures are keyed structurally so that two distinct measures
//! describing the same logical measure coalesce. The last submission wins;
//! the entry keeps the position of its first submission, so a flush walks
//! entries in first-submission order. Entries hold the caller's handle, not
//! a copy.

use rustc_hash::FxHashMap;
use tally_core::models::{Component, Measure, MeasureHandle, MetricId, RuleRef};

/// Identity of a logical measure within one batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PendingKey {
    pub component_key: String,
    pub metric_id: MetricId,
    pub rule: Option<RuleRef>,
    pub characteristic_id: Option<i64>,
    pub person_id: Option<i64>,
}

impl PendingKey {
    pub fn of(component: &Component, measure: &Measure) -> Self {
        Self {
            component_key: component.key.clone(),
            metric_id: measure.metric.id,
            rule: measure.rule.as_ref().map(|scope| scope.rule.clone()),
            characteristic_id: measure.characteristic.as_ref().map(|c| c.id),
            person_id: measure.person_id,
        }
    }
}

/// A measure waiting for the next flush, with the component it belongs to.
#[derive(Debug, Clone)]
pub struct PendingEntry {
    pub component: Component,
    pub measure: MeasureHandle,
}

impl PendingEntry {
    fn key(&self) -> PendingKey {
        PendingKey::of(&self.component, &self.measure.borrow())
    }
}

#[derive(Debug, Default)]
pub struct WriteBuffer {
    entries: Vec<PendingEntry>,
    index: FxHashMap<PendingKey, usize>,
}

impl WriteBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the pending entry for this measure's key.
    /// Returns true when an earlier entry was overwritten.
    pub fn submit(&mut self, component: Component, measure: MeasureHandle) -> bool {
        let entry = PendingEntry { component, measure };
        let key = entry.key();
        match self.index.get(&key) {
            Some(&slot) => {
                self.entries[slot] = entry;
                true
            }
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push(entry);
                false
            }
        }
    }

    pub fn get(&self, key: &PendingKey) -> Option<&PendingEntry> {
        self.index.get(key).map(|&slot| &self.entries[slot])
    }

    /// Remove every entry, in flush order.
    pub fn take(&mut self) -> Vec<PendingEntry> {
        self.index.clear();
        std::mem::take(&mut self.entries)
    }

    /// Put entries back after an interrupted flush. Entries already pending
    /// under the same key are kept over the restored ones.
    pub fn restore(&mut self, entries: impl IntoIterator<Item = PendingEntry>) {
        for entry in entries {
            let key = entry.key();
            if !self.index.contains_key(&key) {
                self.index.insert(key, self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingEntry> {
        self.entries.iter()
    }
}
