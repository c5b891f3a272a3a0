//! Persistence engine errors.
//!
//! Write failures always carry the metric key and the component key so the
//! offending pair can be identified from the message alone. Configuration
//! failures (missing snapshot, unknown rule) are separate variants so the
//! batch pipeline can choose between aborting the run and skipping a measure.

use super::error_code::{self, TallyErrorCode};
use super::StorageError;

/// Why a single measure write failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SaveCause {
    #[error("alert text is {length} characters, column holds at most {max}")]
    AlertTextTooLong { length: usize, max: usize },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors surfaced by `MeasurePersister`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PersistError {
    #[error("Unable to save measure for metric [{metric_key}] on component [{component_key}]")]
    SaveFailed {
        metric_key: String,
        component_key: String,
        #[source]
        cause: SaveCause,
    },

    #[error("No snapshot found for component [{component_key}]")]
    SnapshotNotFound { component_key: String },

    #[error("Can not save a measure with unknown rule [{repository}:{key}]")]
    UnknownRule { repository: String, key: String },

    #[error("Lookup failed: {0}")]
    Lookup(#[from] StorageError),
}

impl PersistError {
    /// Missing snapshot or unresolved rule: the batch is misconfigured,
    /// the store itself is healthy.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::SnapshotNotFound { .. } | Self::UnknownRule { .. }
        )
    }

    /// The rejected value never reached the store.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::SaveFailed {
                cause: SaveCause::AlertTextTooLong { .. },
                ..
            }
        )
    }
}

impl TallyErrorCode for PersistError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::SaveFailed {
                cause: SaveCause::AlertTextTooLong { .. },
                ..
            } => error_code::VALIDATION_ERROR,
            Self::SaveFailed { .. } => error_code::SAVE_FAILED,
            Self::SnapshotNotFound { .. } => error_code::SNAPSHOT_NOT_FOUND,
            Self::UnknownRule { .. } => error_code::UNKNOWN_RULE,
            Self::Lookup(e) => e.error_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_failed_message_names_metric_and_component() {
        let err = PersistError::SaveFailed {
            metric_key: "ncloc".into(),
            component_key: "foo".into(),
            cause: SaveCause::Storage(StorageError::sqlite("disk full")),
        };
        assert_eq!(
            err.to_string(),
            "Unable to save measure for metric [ncloc] on component [foo]"
        );
        assert_eq!(err.error_code(), error_code::SAVE_FAILED);
        assert!(!err.is_configuration());
    }

    #[test]
    fn cause_is_reachable_through_source() {
        use std::error::Error;

        let err = PersistError::SaveFailed {
            metric_key: "ncloc".into(),
            component_key: "foo".into(),
            cause: SaveCause::AlertTextTooLong {
                length: 4010,
                max: 4000,
            },
        };
        let source = err.source().map(ToString::to_string).unwrap_or_default();
        assert!(source.contains("4010"));
        assert!(err.is_validation());
        assert_eq!(err.error_code(), error_code::VALIDATION_ERROR);
    }

    #[test]
    fn configuration_variants_are_flagged() {
        let missing = PersistError::SnapshotNotFound {
            component_key: "foo".into(),
        };
        let rule = PersistError::UnknownRule {
            repository: "pmd".into(),
            key: "key".into(),
        };
        assert!(missing.is_configuration());
        assert!(rule.is_configuration());
        assert!(rule.to_string().contains("pmd:key"));
    }

    #[test]
    fn lookup_error_keeps_storage_code() {
        let err: PersistError = StorageError::sqlite("locked").into();
        assert_eq!(err.error_code(), error_code::STORAGE_ERROR);
    }
}
