//! Narrow collaborator traits the persistence engine is injected with.
//! Each trait carries one capability so fakes stay trivial.

pub mod data_loader;
pub mod measure_writer;
pub mod memory_optimizer;
pub mod rule_finder;
pub mod snapshot_resolver;

pub use data_loader::MeasureDataLoader;
pub use measure_writer::MeasureWriter;
pub use memory_optimizer::{MemoryOptimizer, NoopOptimizer};
pub use rule_finder::RuleFinder;
pub use snapshot_resolver::SnapshotResolver;
