//! PRAGMA configuration applied to every SQLite connection.

use rusqlite::Connection;
use tally_core::errors::StorageError;

use crate::to_storage_err;

/// WAL, NORMAL sync, foreign keys, busy timeout.
pub fn apply_pragmas(conn: &Connection, busy_timeout_ms: u64) -> Result<(), StorageError> {
    conn.execute_batch(&format!(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA cache_size = -16000;
        PRAGMA busy_timeout = {busy_timeout_ms};
        PRAGMA foreign_keys = ON;
        "
    ))
    .map_err(to_storage_err)
}

/// Read connections never write.
pub fn apply_read_pragmas(conn: &Connection, busy_timeout_ms: u64) -> Result<(), StorageError> {
    conn.execute_batch(&format!(
        "
        PRAGMA query_only = ON;
        PRAGMA busy_timeout = {busy_timeout_ms};
        "
    ))
    .map_err(to_storage_err)
}
