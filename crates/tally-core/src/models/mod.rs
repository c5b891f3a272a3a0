//! Domain model: components, metrics, rules, measures, and storage records.

pub mod component;
pub mod handle;
pub mod ids;
pub mod measure;
pub mod metric;
pub mod record;
pub mod rule;

pub use component::{Component, Qualifier};
pub use handle::MeasureHandle;
pub use ids::{MeasureId, MetricId, SnapshotId};
pub use measure::{AlertStatus, Characteristic, Measure, PersistenceMode, RuleScope};
pub use metric::{Metric, ValueType};
pub use record::{MeasureDataRecord, MeasureRecord};
pub use rule::{Rule, RuleRef, Severity};
