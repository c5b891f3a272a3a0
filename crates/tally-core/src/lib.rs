//! # tally-core
//!
//! Foundation crate for the Tally measure persistence engine.
//! Defines the measure model, the collaborator traits the engine is
//! injected with, errors, config, constants, and tracing setup.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;
pub mod tracing_setup;

pub use config::TallyConfig;
pub use errors::{PersistError, SaveCause, StorageError, TallyErrorCode};
pub use models::{
    Characteristic, Component, Measure, MeasureDataRecord, MeasureHandle, MeasureId, MeasureRecord,
    Metric, MetricId, PersistenceMode, Qualifier, Rule, RuleRef, Severity, SnapshotId, ValueType,
};
