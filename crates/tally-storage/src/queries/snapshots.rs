//! Queries for the snapshots table.

use rusqlite::{params, Connection, OptionalExtension};
use tally_core::errors::StorageError;
use tally_core::models::Qualifier;

use crate::to_storage_err;

/// Insert a snapshot for `component_key` in `analysis_id`, or return the
/// existing one.
pub fn insert_snapshot(
    conn: &Connection,
    analysis_id: &str,
    component_key: &str,
    qualifier: Qualifier,
) -> Result<i64, StorageError> {
    conn.execute(
        "INSERT OR IGNORE INTO snapshots (analysis_id, component_key, qualifier)
         VALUES (?1, ?2, ?3)",
        params![analysis_id, component_key, qualifier.as_str()],
    )
    .map_err(to_storage_err)?;

    find_snapshot(conn, analysis_id, component_key)?.ok_or_else(|| StorageError::NotFound {
        entity: "snapshot",
        id: component_key.to_string(),
    })
}

pub fn find_snapshot(
    conn: &Connection,
    analysis_id: &str,
    component_key: &str,
) -> Result<Option<i64>, StorageError> {
    conn.prepare_cached(
        "SELECT id FROM snapshots WHERE analysis_id = ?1 AND component_key = ?2",
    )
    .map_err(to_storage_err)?
    .query_row(params![analysis_id, component_key], |row| row.get(0))
    .optional()
    .map_err(to_storage_err)
}
