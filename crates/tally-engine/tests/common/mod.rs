//! In-memory fakes for the persister's collaborators.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use tally_core::errors::StorageError;
use tally_core::models::{
    Component, Measure, MeasureId, MeasureRecord, Metric, MetricId, Rule, SnapshotId, ValueType,
};
use tally_core::traits::{MeasureWriter, MemoryOptimizer, RuleFinder, SnapshotResolver};
use tally_engine::{MeasurePersister, PersisterOptions};

#[derive(Default)]
pub struct FakeSnapshots {
    ids: HashMap<String, SnapshotId>,
}

impl FakeSnapshots {
    pub fn with(entries: &[(&str, i64)]) -> Self {
        Self {
            ids: entries
                .iter()
                .map(|(key, id)| (key.to_string(), SnapshotId(*id)))
                .collect(),
        }
    }
}

impl SnapshotResolver for FakeSnapshots {
    fn snapshot_id(&self, component: &Component) -> Result<Option<SnapshotId>, StorageError> {
        Ok(self.ids.get(&component.key).copied())
    }
}

#[derive(Default)]
pub struct FakeRules {
    rules: Vec<Rule>,
}

impl FakeRules {
    pub fn with(repository: &str, key: &str, id: i64) -> Self {
        Self {
            rules: vec![Rule {
                id,
                repository: repository.into(),
                key: key.into(),
                name: None,
            }],
        }
    }
}

impl RuleFinder for FakeRules {
    fn find_by_key(&self, repository: &str, key: &str) -> Result<Option<Rule>, StorageError> {
        Ok(self
            .rules
            .iter()
            .find(|r| r.repository == repository && r.key == key)
            .cloned())
    }
}

/// Stores records in a vector; ids start at 1 and data ids at 1000.
pub struct FakeWriter {
    pub rows: RefCell<Vec<MeasureRecord>>,
    pub inserts: Cell<usize>,
    pub updates: Cell<usize>,
    next_data_id: Cell<i64>,
    fail_metric: Cell<Option<MetricId>>,
}

impl Default for FakeWriter {
    fn default() -> Self {
        Self {
            rows: RefCell::new(Vec::new()),
            inserts: Cell::new(0),
            updates: Cell::new(0),
            next_data_id: Cell::new(1000),
            fail_metric: Cell::new(None),
        }
    }
}

impl FakeWriter {
    /// Make every write of `metric` fail with a storage error.
    pub fn fail_on(&self, metric: MetricId) {
        self.fail_metric.set(Some(metric));
    }

    pub fn row_count(&self) -> usize {
        self.rows.borrow().len()
    }

    pub fn values(&self) -> Vec<Option<f64>> {
        self.rows.borrow().iter().map(|r| r.value).collect()
    }

    pub fn writes(&self) -> usize {
        self.inserts.get() + self.updates.get()
    }

    fn check(&self, record: &MeasureRecord) -> Result<(), StorageError> {
        if self.fail_metric.get() == Some(record.metric_id) {
            return Err(StorageError::sqlite("constraint failed"));
        }
        Ok(())
    }

    fn assign_data_id(&self, record: &mut MeasureRecord) {
        if let Some(data) = record.data.as_mut() {
            let id = self.next_data_id.get();
            self.next_data_id.set(id + 1);
            data.id = Some(id);
        }
    }
}

impl MeasureWriter for FakeWriter {
    fn insert(&self, record: &mut MeasureRecord) -> Result<MeasureId, StorageError> {
        self.check(record)?;
        let id = MeasureId(self.rows.borrow().len() as i64 + 1);
        record.id = Some(id);
        self.assign_data_id(record);
        self.rows.borrow_mut().push(record.clone());
        self.inserts.set(self.inserts.get() + 1);
        Ok(id)
    }

    fn update(&self, record: &mut MeasureRecord) -> Result<(), StorageError> {
        self.check(record)?;
        let index = record
            .id
            .map(|id| id.get() as usize)
            .filter(|&i| i >= 1 && i <= self.rows.borrow().len())
            .ok_or_else(|| StorageError::NotFound {
                entity: "measure",
                id: format!("{:?}", record.id),
            })?;
        self.assign_data_id(record);
        self.rows.borrow_mut()[index - 1] = record.clone();
        self.updates.set(self.updates.get() + 1);
        Ok(())
    }
}

/// Records every eviction callback.
#[derive(Default)]
pub struct RecordingOptimizer {
    pub evictions: Vec<(Option<MeasureId>, MeasureRecord)>,
    pub reloads: usize,
}

impl MemoryOptimizer for RecordingOptimizer {
    fn on_evict(&mut self, measure: &mut Measure, record: &MeasureRecord) {
        self.evictions.push((measure.id(), record.clone()));
    }

    fn reload(&mut self, _measure: &mut Measure) -> Result<(), StorageError> {
        self.reloads += 1;
        Ok(())
    }
}

pub type TestPersister<'a> =
    MeasurePersister<&'a FakeSnapshots, &'a FakeRules, &'a FakeWriter, RecordingOptimizer>;

pub fn persister<'a>(
    snapshots: &'a FakeSnapshots,
    rules: &'a FakeRules,
    writer: &'a FakeWriter,
    options: PersisterOptions,
) -> TestPersister<'a> {
    MeasurePersister::new(snapshots, rules, writer, RecordingOptimizer::default(), options)
}

pub fn delayed() -> PersisterOptions {
    PersisterOptions {
        delayed: true,
        ..Default::default()
    }
}

pub fn ncloc() -> Metric {
    Metric::new(1, "ncloc", ValueType::Int)
}

pub fn coverage() -> Metric {
    Metric::new(2, "coverage", ValueType::Percent).with_optimized_best_value(100.0)
}

pub fn violations() -> Metric {
    Metric::new(5, "violations", ValueType::Int)
}

pub fn distribution() -> Metric {
    Metric::new(9, "function_complexity_distribution", ValueType::Distrib)
}
