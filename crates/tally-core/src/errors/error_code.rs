//! Stable error codes surfaced to the host pipeline.

pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const SAVE_FAILED: &str = "SAVE_FAILED";
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
pub const SNAPSHOT_NOT_FOUND: &str = "SNAPSHOT_NOT_FOUND";
pub const UNKNOWN_RULE: &str = "UNKNOWN_RULE";

/// Maps an error to a stable, machine-readable code.
pub trait TallyErrorCode {
    fn error_code(&self) -> &'static str;
}
