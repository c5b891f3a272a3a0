//! Storage-layer errors.

use super::error_code::{self, TallyErrorCode};

/// Errors raised by the durable store and its lookups.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
}

impl StorageError {
    /// Shorthand for the common `SqliteError` case.
    pub fn sqlite(message: impl Into<String>) -> Self {
        Self::SqliteError {
            message: message.into(),
        }
    }
}

impl TallyErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        error_code::STORAGE_ERROR
    }
}
