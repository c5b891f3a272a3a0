//! SQLite implementations of the engine's collaborator traits.
//!
//! Every adapter holds an `Arc<DatabaseManager>` so one database can back
//! the resolver, the rule finder, the writer, and the data loader of a batch.

use std::sync::Arc;

use tally_core::errors::StorageError;
use tally_core::models::{Component, MeasureId, MeasureRecord, Rule, SnapshotId};
use tally_core::traits::{MeasureDataLoader, MeasureWriter, RuleFinder, SnapshotResolver};

use crate::connection::writer::with_immediate_transaction;
use crate::connection::DatabaseManager;
use crate::queries::{measure_data, measures, rules, snapshots};

/// Resolves components to the snapshots recorded for one analysis run.
pub struct SqliteSnapshotResolver {
    db: Arc<DatabaseManager>,
    analysis_id: String,
}

impl SqliteSnapshotResolver {
    pub fn new(db: Arc<DatabaseManager>, analysis_id: impl Into<String>) -> Self {
        Self {
            db,
            analysis_id: analysis_id.into(),
        }
    }

    /// Record a snapshot for `component` in this run (idempotent).
    pub fn register(&self, component: &Component) -> Result<SnapshotId, StorageError> {
        self.db
            .with_writer(|conn| {
                snapshots::insert_snapshot(
                    conn,
                    &self.analysis_id,
                    &component.key,
                    component.qualifier,
                )
            })
            .map(SnapshotId)
    }

    pub fn analysis_id(&self) -> &str {
        &self.analysis_id
    }
}

impl SnapshotResolver for SqliteSnapshotResolver {
    fn snapshot_id(&self, component: &Component) -> Result<Option<SnapshotId>, StorageError> {
        let id = self.db.with_reader(|conn| {
            snapshots::find_snapshot(conn, &self.analysis_id, &component.key)
        })?;
        Ok(id.map(SnapshotId))
    }
}

pub struct SqliteRuleFinder {
    db: Arc<DatabaseManager>,
}

impl SqliteRuleFinder {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }
}

impl RuleFinder for SqliteRuleFinder {
    fn find_by_key(&self, repository: &str, key: &str) -> Result<Option<Rule>, StorageError> {
        self.db
            .with_reader(|conn| rules::find_by_key(conn, repository, key))
    }
}

/// Writes a measure row and its spill-over row in one transaction.
pub struct SqliteMeasureWriter {
    db: Arc<DatabaseManager>,
}

impl SqliteMeasureWriter {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }
}

impl MeasureWriter for SqliteMeasureWriter {
    fn insert(&self, record: &mut MeasureRecord) -> Result<MeasureId, StorageError> {
        let (id, data_id) = self.db.with_writer(|conn| {
            with_immediate_transaction(conn, |tx| {
                let id = measures::insert_measure(tx, record)?;
                let data_id = match &record.data {
                    Some(data) => Some(measure_data::insert_data(
                        tx,
                        id,
                        data.snapshot_id.get(),
                        &data.data,
                    )?),
                    None => None,
                };
                Ok((id, data_id))
            })
        })?;

        // Ids are only handed out once the transaction committed.
        record.id = Some(MeasureId(id));
        if let Some(data) = record.data.as_mut() {
            data.id = data_id;
        }
        tracing::trace!(measure_id = id, ?data_id, "measure inserted");
        Ok(MeasureId(id))
    }

    fn update(&self, record: &mut MeasureRecord) -> Result<(), StorageError> {
        let id = record.id.ok_or_else(|| StorageError::NotFound {
            entity: "measure",
            id: "<unassigned>".to_string(),
        })?;

        let data_id = self.db.with_writer(|conn| {
            with_immediate_transaction(conn, |tx| {
                measures::update_measure(tx, id.get(), record)?;
                measure_data::delete_for_measure(tx, id.get())?;
                match &record.data {
                    Some(data) => Ok(Some(measure_data::insert_data(
                        tx,
                        id.get(),
                        data.snapshot_id.get(),
                        &data.data,
                    )?)),
                    None => Ok(None),
                }
            })
        })?;

        if let Some(data) = record.data.as_mut() {
            data.id = data_id;
        }
        tracing::trace!(measure_id = %id, ?data_id, "measure updated");
        Ok(())
    }
}

/// Reads spill-over text back for the memory optimizer.
pub struct SqliteMeasureDataLoader {
    db: Arc<DatabaseManager>,
}

impl SqliteMeasureDataLoader {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }
}

impl MeasureDataLoader for SqliteMeasureDataLoader {
    fn load_data(&self, data_id: i64) -> Result<Option<String>, StorageError> {
        let row = self
            .db
            .with_reader(|conn| measure_data::get_data(conn, data_id))?;
        Ok(row.map(|r| r.data))
    }
}
