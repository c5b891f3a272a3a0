//! The measure persister: admission, delayed buffering, and writes.

use tally_core::config::PersistenceConfig;
use tally_core::constants::{DEFAULT_ALERT_TEXT_MAX_LEN, DEFAULT_INLINE_TEXT_LIMIT};
use tally_core::errors::{PersistError, SaveCause, StorageError};
use tally_core::models::{
    Component, Measure, MeasureHandle, MeasureId, MeasureRecord, SnapshotId,
};
use tally_core::traits::{
    MeasureWriter, MemoryOptimizer, NoopOptimizer, RuleFinder, SnapshotResolver,
};
use tally_core::{dump_span, save_measure_span};

use crate::buffer::{PendingEntry, WriteBuffer};
use crate::policy::AdmissionPolicy;

/// Engine settings, usually taken from `[persistence]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersisterOptions {
    pub delayed: bool,
    pub inline_text_limit: usize,
    pub alert_text_max_len: usize,
    pub skip_empty_measures: bool,
}

impl Default for PersisterOptions {
    fn default() -> Self {
        Self {
            delayed: false,
            inline_text_limit: DEFAULT_INLINE_TEXT_LIMIT,
            alert_text_max_len: DEFAULT_ALERT_TEXT_MAX_LEN,
            skip_empty_measures: false,
        }
    }
}

impl From<&PersistenceConfig> for PersisterOptions {
    fn from(config: &PersistenceConfig) -> Self {
        Self {
            delayed: config.effective_delayed_mode(),
            inline_text_limit: config.effective_inline_text_limit(),
            alert_text_max_len: config.effective_alert_text_max_len(),
            skip_empty_measures: config.effective_skip_empty_measures(),
        }
    }
}

/// What `save_measure` did with a measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Rejected by the admission policy.
    Skipped,
    /// Held in the write buffer until the next `dump`.
    Deferred,
    /// Written; the measure carries this id.
    Persisted(MeasureId),
}

/// Result of a complete flush.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DumpReport {
    pub flushed: usize,
    pub inserted: usize,
    pub updated: usize,
    /// Ids of the flushed measures, in flush order.
    pub ids: Vec<MeasureId>,
}

struct Written {
    id: MeasureId,
    inserted: bool,
}

/// Persists measures for one analysis batch.
///
/// One instance per batch and per thread: the write buffer is not shared.
pub struct MeasurePersister<S, R, W, O = NoopOptimizer> {
    snapshots: S,
    rules: R,
    writer: W,
    optimizer: O,
    policy: AdmissionPolicy,
    options: PersisterOptions,
    buffer: WriteBuffer,
}

impl<S, R, W, O> MeasurePersister<S, R, W, O>
where
    S: SnapshotResolver,
    R: RuleFinder,
    W: MeasureWriter,
    O: MemoryOptimizer,
{
    pub fn new(snapshots: S, rules: R, writer: W, optimizer: O, options: PersisterOptions) -> Self {
        Self {
            snapshots,
            rules,
            writer,
            optimizer,
            policy: AdmissionPolicy::new(options.skip_empty_measures),
            options,
            buffer: WriteBuffer::new(),
        }
    }

    pub fn from_config(
        snapshots: S,
        rules: R,
        writer: W,
        optimizer: O,
        config: &PersistenceConfig,
    ) -> Self {
        Self::new(snapshots, rules, writer, optimizer, PersisterOptions::from(config))
    }

    /// Switch delayed mode for the batch. Entries already buffered stay
    /// pending until the next `dump`.
    pub fn set_delayed_mode(&mut self, delayed: bool) {
        if self.options.delayed != delayed {
            tracing::debug!(delayed, pending = self.buffer.len(), "delayed mode changed");
        }
        self.options.delayed = delayed;
    }

    pub fn is_delayed(&self) -> bool {
        self.options.delayed
    }

    pub fn options(&self) -> &PersisterOptions {
        &self.options
    }

    pub fn pending_count(&self) -> usize {
        self.buffer.len()
    }

    pub fn pending(&self) -> impl Iterator<Item = &PendingEntry> {
        self.buffer.iter()
    }

    pub fn optimizer(&self) -> &O {
        &self.optimizer
    }

    pub fn optimizer_mut(&mut self) -> &mut O {
        &mut self.optimizer
    }

    /// Admit, buffer, or write `measure`.
    ///
    /// In delayed mode the handle itself is buffered, so the id assigned and
    /// the payload evicted by the next `dump` land on the caller's measure;
    /// changes made to it before the flush are written. Database-only
    /// measures are always written immediately. A measure gets its storage
    /// id on first insert and goes through the update path afterwards.
    ///
    /// # Panics
    /// If the caller holds a borrow of `measure` across the call.
    pub fn save_measure(
        &mut self,
        component: &Component,
        measure: &MeasureHandle,
    ) -> Result<SaveOutcome, PersistError> {
        let mut guard = measure.borrow_mut();
        let _span = save_measure_span!(component.key, guard.metric_key()).entered();

        if !self.policy.admits(component, &guard) {
            tracing::debug!("measure not admitted");
            return Ok(SaveOutcome::Skipped);
        }

        if self.options.delayed && guard.persistence_mode.use_memory() {
            drop(guard);
            let replaced = self.buffer.submit(component.clone(), measure.clone());
            tracing::debug!(replaced, pending = self.buffer.len(), "measure buffered");
            return Ok(SaveOutcome::Deferred);
        }

        self.persist(component, &mut guard)
            .map(|written| SaveOutcome::Persisted(written.id))
    }

    /// Write every pending measure in first-submission order.
    ///
    /// On failure the entries already written stay committed and leave the
    /// buffer; the failing entry and everything after it stay pending.
    pub fn dump(&mut self) -> Result<DumpReport, PersistError> {
        let pending = self.buffer.take();
        let _span = dump_span!(pending.len()).entered();
        tracing::info!(count = pending.len(), "{} measures to dump", pending.len());

        let mut report = DumpReport::default();
        let mut entries = pending.into_iter();
        while let Some(entry) = entries.next() {
            let result = {
                let mut measure = entry.measure.borrow_mut();
                self.persist(&entry.component, &mut measure)
            };
            match result {
                Ok(written) => {
                    report.flushed += 1;
                    if written.inserted {
                        report.inserted += 1;
                    } else {
                        report.updated += 1;
                    }
                    report.ids.push(written.id);
                }
                Err(e) => {
                    self.buffer.restore(std::iter::once(entry).chain(entries));
                    tracing::warn!(
                        flushed = report.flushed,
                        remaining = self.buffer.len(),
                        error = %e,
                        "dump interrupted"
                    );
                    return Err(e);
                }
            }
        }

        tracing::info!(
            inserted = report.inserted,
            updated = report.updated,
            "dump complete"
        );
        Ok(report)
    }

    /// Bring evicted fields of `measure` back into memory.
    pub fn reload_measure(&mut self, measure: &MeasureHandle) -> Result<(), PersistError> {
        self.optimizer.reload(&mut measure.borrow_mut())?;
        Ok(())
    }

    fn persist(
        &mut self,
        component: &Component,
        measure: &mut Measure,
    ) -> Result<Written, PersistError> {
        if let Some(text) = measure.alert_text.as_deref() {
            let length = text.chars().count();
            if length > self.options.alert_text_max_len {
                return Err(save_failed(
                    component,
                    measure,
                    SaveCause::AlertTextTooLong {
                        length,
                        max: self.options.alert_text_max_len,
                    },
                ));
            }
        }

        let snapshot_id = self.snapshots.snapshot_id(component)?.ok_or_else(|| {
            PersistError::SnapshotNotFound {
                component_key: component.key.clone(),
            }
        })?;
        let mut record = self.build_record(snapshot_id, measure)?;

        let written = match measure.id() {
            Some(id) => {
                record.id = Some(id);
                self.writer
                    .update(&mut record)
                    .map_err(|e| storage_failed(component, measure, e))?;
                Written {
                    id,
                    inserted: false,
                }
            }
            None => {
                let id = self
                    .writer
                    .insert(&mut record)
                    .map_err(|e| storage_failed(component, measure, e))?;
                measure.assign_id(id);
                Written { id, inserted: true }
            }
        };

        tracing::debug!(
            measure_id = %written.id,
            snapshot_id = %snapshot_id,
            inserted = written.inserted,
            spilled = record.data.is_some(),
            "measure written"
        );
        self.optimizer.on_evict(measure, &record);
        Ok(written)
    }

    fn build_record(
        &self,
        snapshot_id: SnapshotId,
        measure: &Measure,
    ) -> Result<MeasureRecord, PersistError> {
        let mut record = MeasureRecord::new(snapshot_id, measure.metric.id);
        record.value = measure.value;
        record.set_text(measure.data.as_deref(), self.options.inline_text_limit);
        record.characteristic_id = measure.characteristic.as_ref().map(|c| c.id);
        record.person_id = measure.person_id;
        record.alert_status = measure.alert_status;
        record.alert_text = measure.alert_text.clone();
        record.description = measure.description.clone();
        record.url = measure.url.clone();
        record.tendency = measure.tendency;
        record.variations = measure.variations;

        if let Some(scope) = &measure.rule {
            let rule = self
                .rules
                .find_by_key(&scope.rule.repository, &scope.rule.key)?
                .ok_or_else(|| PersistError::UnknownRule {
                    repository: scope.rule.repository.clone(),
                    key: scope.rule.key.clone(),
                })?;
            record.rule_id = Some(rule.id);
            record.rule_severity = Some(scope.severity);
        }
        Ok(record)
    }
}

fn save_failed(component: &Component, measure: &Measure, cause: SaveCause) -> PersistError {
    PersistError::SaveFailed {
        metric_key: measure.metric_key().to_string(),
        component_key: component.key.clone(),
        cause,
    }
}

fn storage_failed(component: &Component, measure: &Measure, error: StorageError) -> PersistError {
    tracing::warn!(
        metric = measure.metric_key(),
        component = %component.key,
        error = %error,
        "measure write failed"
    );
    save_failed(component, measure, SaveCause::Storage(error))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_follow_config_defaults() {
        let options = PersisterOptions::from(&PersistenceConfig::default());
        assert_eq!(options, PersisterOptions::default());
        assert_eq!(options.inline_text_limit, 96);
        assert_eq!(options.alert_text_max_len, 4000);
    }

    #[test]
    fn options_take_configured_values() {
        let config = PersistenceConfig {
            delayed_mode: Some(true),
            inline_text_limit: Some(16),
            alert_text_max_len: Some(10),
            skip_empty_measures: Some(true),
        };
        let options = PersisterOptions::from(&config);
        assert!(options.delayed);
        assert_eq!(options.inline_text_limit, 16);
        assert_eq!(options.alert_text_max_len, 10);
        assert!(options.skip_empty_measures);
    }
}
