//! Measures: values computed by analysis for one (component, metric) pair.

use std::fmt;

use super::{MeasureId, Metric, RuleRef, Severity};
use crate::constants::VARIATION_COUNT;

/// Where a measure is allowed to live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PersistenceMode {
    /// Kept in memory for the batch, never written.
    Memory,
    /// Written straight to storage, never held back in the write buffer.
    Database,
    /// Both: buffered in delayed mode and written.
    #[default]
    Persistent,
}

impl PersistenceMode {
    pub fn use_memory(self) -> bool {
        matches!(self, Self::Memory | Self::Persistent)
    }

    pub fn use_database(self) -> bool {
        matches!(self, Self::Database | Self::Persistent)
    }
}

/// Quality-gate status attached to a measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertStatus {
    Ok,
    Warn,
    Error,
}

impl AlertStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quality-model characteristic a measure is aggregated on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Characteristic {
    pub id: i64,
    pub key: String,
}

/// Rule scope of a rule measure. Severity is mandatory whenever a rule is set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleScope {
    pub rule: RuleRef,
    pub severity: Severity,
}

/// A computed measure.
///
/// The storage id is assigned on the first successful write and never
/// changes afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Measure {
    pub metric: Metric,
    pub value: Option<f64>,
    pub data: Option<String>,
    pub rule: Option<RuleScope>,
    pub characteristic: Option<Characteristic>,
    pub person_id: Option<i64>,
    pub persistence_mode: PersistenceMode,
    /// Variations against the five comparison periods; index 0 is variation-1.
    pub variations: [Option<f64>; VARIATION_COUNT],
    pub alert_status: Option<AlertStatus>,
    pub alert_text: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub tendency: Option<i32>,
    id: Option<MeasureId>,
}

impl Measure {
    pub fn new(metric: Metric) -> Self {
        Self {
            metric,
            value: None,
            data: None,
            rule: None,
            characteristic: None,
            person_id: None,
            persistence_mode: PersistenceMode::default(),
            variations: [None; VARIATION_COUNT],
            alert_status: None,
            alert_text: None,
            description: None,
            url: None,
            tendency: None,
            id: None,
        }
    }

    /// A measure scoped to a rule at a given severity.
    pub fn for_rule(metric: Metric, rule: RuleRef, severity: Severity) -> Self {
        let mut measure = Self::new(metric);
        measure.rule = Some(RuleScope { rule, severity });
        measure
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn with_persistence_mode(mut self, mode: PersistenceMode) -> Self {
        self.persistence_mode = mode;
        self
    }

    /// Set variation `index` (1-based, 1..=5). Out-of-range indexes are ignored.
    pub fn with_variation(mut self, index: usize, value: f64) -> Self {
        if let Some(slot) = index.checked_sub(1).and_then(|i| self.variations.get_mut(i)) {
            *slot = Some(value);
        }
        self
    }

    pub fn with_alert(mut self, status: AlertStatus, text: impl Into<String>) -> Self {
        self.alert_status = Some(status);
        self.alert_text = Some(text.into());
        self
    }

    pub fn with_alert_text(mut self, text: impl Into<String>) -> Self {
        self.alert_text = Some(text.into());
        self
    }

    pub fn with_characteristic(mut self, characteristic: Characteristic) -> Self {
        self.characteristic = Some(characteristic);
        self
    }

    pub fn with_person(mut self, person_id: i64) -> Self {
        self.person_id = Some(person_id);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_tendency(mut self, tendency: i32) -> Self {
        self.tendency = Some(tendency);
        self
    }

    /// A measure that already has a row in storage (e.g. loaded from a
    /// previous step of the batch).
    pub fn with_id(mut self, id: MeasureId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn set_value(&mut self, value: f64) -> &mut Self {
        self.value = Some(value);
        self
    }

    pub fn id(&self) -> Option<MeasureId> {
        self.id
    }

    /// Record the storage id handed back by the first insert. Later calls are
    /// ignored: the id of a persisted measure never changes.
    pub fn assign_id(&mut self, id: MeasureId) {
        if self.id.is_none() {
            self.id = Some(id);
        }
    }

    pub fn metric_key(&self) -> &str {
        &self.metric.key
    }

    pub fn variation(&self, index: usize) -> Option<f64> {
        index
            .checked_sub(1)
            .and_then(|i| self.variations.get(i).copied().flatten())
    }

    pub fn variation1(&self) -> Option<f64> {
        self.variations[0]
    }

    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    /// Drop the text payload from memory, returning it.
    pub fn take_data(&mut self) -> Option<String> {
        self.data.take()
    }

    /// No value, no text, no variation: nothing worth recording.
    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.data.is_none() && self.variations.iter().all(Option::is_none)
    }
}
