//! Query modules, one per table.

pub mod measure_data;
pub mod measures;
pub mod rules;
pub mod snapshots;
