//! Storage records built by the engine for each write.

use super::{AlertStatus, MeasureId, MetricId, Severity, SnapshotId};
use crate::constants::VARIATION_COUNT;

/// Spill-over row for text payloads too large for the inline column.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasureDataRecord {
    /// Assigned by the store on insert.
    pub id: Option<i64>,
    pub snapshot_id: SnapshotId,
    pub data: String,
}

/// The durable representation of a measure.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasureRecord {
    pub id: Option<MeasureId>,
    pub snapshot_id: SnapshotId,
    pub metric_id: MetricId,
    pub rule_id: Option<i64>,
    pub rule_severity: Option<Severity>,
    pub characteristic_id: Option<i64>,
    pub person_id: Option<i64>,
    pub value: Option<f64>,
    pub text_value: Option<String>,
    pub data: Option<MeasureDataRecord>,
    pub alert_status: Option<AlertStatus>,
    pub alert_text: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub tendency: Option<i32>,
    pub variations: [Option<f64>; VARIATION_COUNT],
}

impl MeasureRecord {
    pub fn new(snapshot_id: SnapshotId, metric_id: MetricId) -> Self {
        Self {
            id: None,
            snapshot_id,
            metric_id,
            rule_id: None,
            rule_severity: None,
            characteristic_id: None,
            person_id: None,
            value: None,
            text_value: None,
            data: None,
            alert_status: None,
            alert_text: None,
            description: None,
            url: None,
            tendency: None,
            variations: [None; VARIATION_COUNT],
        }
    }

    /// Store `text` inline when it fits in `inline_limit` characters,
    /// otherwise in a spill-over record.
    pub fn set_text(&mut self, text: Option<&str>, inline_limit: usize) {
        self.text_value = None;
        self.data = None;
        match text {
            Some(t) if t.chars().count() > inline_limit => {
                self.data = Some(MeasureDataRecord {
                    id: None,
                    snapshot_id: self.snapshot_id,
                    data: t.to_string(),
                });
            }
            Some(t) => self.text_value = Some(t.to_string()),
            None => {}
        }
    }

    /// The text payload, wherever it is stored.
    pub fn text(&self) -> Option<&str> {
        self.data
            .as_ref()
            .map(|d| d.data.as_str())
            .or(self.text_value.as_deref())
    }

    pub fn data_id(&self) -> Option<i64> {
        self.data.as_ref().and_then(|d| d.id)
    }
}
