//! Queries for the measure_data (spill-over text) table.

use rusqlite::{params, Connection, OptionalExtension};
use tally_core::errors::StorageError;

use crate::to_storage_err;

#[derive(Debug, Clone, PartialEq)]
pub struct MeasureDataRow {
    pub id: i64,
    pub measure_id: i64,
    pub snapshot_id: i64,
    pub data: String,
}

pub fn insert_data(
    conn: &Connection,
    measure_id: i64,
    snapshot_id: i64,
    data: &str,
) -> Result<i64, StorageError> {
    conn.prepare_cached(
        "INSERT INTO measure_data (measure_id, snapshot_id, data) VALUES (?1, ?2, ?3)",
    )
    .map_err(to_storage_err)?
    .execute(params![measure_id, snapshot_id, data])
    .map_err(to_storage_err)?;
    Ok(conn.last_insert_rowid())
}

/// Remove every spill-over row of a measure. Returns the number removed.
pub fn delete_for_measure(conn: &Connection, measure_id: i64) -> Result<usize, StorageError> {
    conn.execute(
        "DELETE FROM measure_data WHERE measure_id = ?1",
        params![measure_id],
    )
    .map_err(to_storage_err)
}

pub fn get_data(conn: &Connection, id: i64) -> Result<Option<MeasureDataRow>, StorageError> {
    conn.prepare_cached(
        "SELECT id, measure_id, snapshot_id, data FROM measure_data WHERE id = ?1",
    )
    .map_err(to_storage_err)?
    .query_row(params![id], map_row)
    .optional()
    .map_err(to_storage_err)
}

pub fn get_for_measure(
    conn: &Connection,
    measure_id: i64,
) -> Result<Option<MeasureDataRow>, StorageError> {
    conn.prepare_cached(
        "SELECT id, measure_id, snapshot_id, data FROM measure_data
         WHERE measure_id = ?1 ORDER BY id DESC LIMIT 1",
    )
    .map_err(to_storage_err)?
    .query_row(params![measure_id], map_row)
    .optional()
    .map_err(to_storage_err)
}

pub fn count(conn: &Connection) -> Result<i64, StorageError> {
    conn.query_row("SELECT COUNT(*) FROM measure_data", [], |row| row.get(0))
        .map_err(to_storage_err)
}

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MeasureDataRow> {
    Ok(MeasureDataRow {
        id: row.get(0)?,
        measure_id: row.get(1)?,
        snapshot_id: row.get(2)?,
        data: row.get(3)?,
    })
}
