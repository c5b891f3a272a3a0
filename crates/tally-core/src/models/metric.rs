//! Metric definitions.

/// Value type of a metric. `Data` and `Distrib` metrics carry their payload
/// as text and are the ones whose text is evicted from memory once stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Int,
    Float,
    Percent,
    Bool,
    String,
    Millisec,
    Data,
    Level,
    Distrib,
    Rating,
    WorkDuration,
}

/// A measurable attribute, e.g. `ncloc` or `coverage`.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub id: super::MetricId,
    pub key: String,
    pub value_type: ValueType,
    /// Canonical "uninteresting" value.
    pub best_value: Option<f64>,
    /// When set, measures equal to `best_value` are not stored at file level.
    pub optimized_best_value: bool,
}

impl Metric {
    pub fn new(id: i64, key: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            id: super::MetricId(id),
            key: key.into(),
            value_type,
            best_value: None,
            optimized_best_value: false,
        }
    }

    /// Declare `value` as the best value and enable storage optimization for it.
    pub fn with_optimized_best_value(mut self, value: f64) -> Self {
        self.best_value = Some(value);
        self.optimized_best_value = true;
        self
    }

    /// Declare a best value without enabling storage optimization.
    pub fn with_best_value(mut self, value: f64) -> Self {
        self.best_value = Some(value);
        self
    }

    /// The value measures are compared against for best-value skipping, if
    /// this metric opts in to the optimization.
    pub fn optimized_best_value(&self) -> Option<f64> {
        if self.optimized_best_value {
            self.best_value
        } else {
            None
        }
    }

    pub fn is_data_type(&self) -> bool {
        matches!(self.value_type, ValueType::Data | ValueType::Distrib)
    }
}
