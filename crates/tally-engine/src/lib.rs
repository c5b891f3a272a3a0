//! # tally-engine
//!
//! Measure persistence for analysis batches: the admission policy that
//! drops redundant measures, the delayed-mode write buffer, the persister
//! that turns measures into storage records, and a memory optimizer that
//! evicts stored text payloads.

pub mod buffer;
pub mod engine;
pub mod optimizer;
pub mod policy;

pub use buffer::{PendingEntry, PendingKey, WriteBuffer};
pub use engine::{DumpReport, MeasurePersister, PersisterOptions, SaveOutcome};
pub use optimizer::DataEvictingOptimizer;
pub use policy::{should_persist, AdmissionPolicy};
