//! # tally-storage
//!
//! SQLite persistence for measures: a serialized writer connection with a
//! read pool, versioned migrations, per-table query modules, and adapters
//! implementing the `tally-core` collaborator traits.

pub mod adapters;
pub mod connection;
pub mod migrations;
pub mod queries;

pub use adapters::{
    SqliteMeasureDataLoader, SqliteMeasureWriter, SqliteRuleFinder, SqliteSnapshotResolver,
};
pub use connection::DatabaseManager;

use tally_core::errors::StorageError;

pub(crate) fn to_storage_err(message: impl std::fmt::Display) -> StorageError {
    StorageError::SqliteError {
        message: message.to_string(),
    }
}
