//! Error handling for Tally.
//! One error enum per subsystem, `thiserror` only.

pub mod config_error;
pub mod error_code;
pub mod persist_error;
pub mod storage_error;

pub use config_error::ConfigError;
pub use error_code::TallyErrorCode;
pub use persist_error::{PersistError, SaveCause};
pub use storage_error::StorageError;
