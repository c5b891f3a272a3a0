//! Configuration system for Tally.
//! TOML-based, layered resolution: overrides > env > project > user > defaults.

pub mod logging_config;
pub mod persistence_config;
pub mod storage_config;
pub mod tally_config;

pub use logging_config::LoggingConfig;
pub use persistence_config::PersistenceConfig;
pub use storage_config::StorageConfig;
pub use tally_config::{ConfigOverrides, TallyConfig};
