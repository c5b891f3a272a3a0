//! Queries for the project_measures table.

use rusqlite::{params, Connection, OptionalExtension};
use tally_core::errors::StorageError;
use tally_core::constants::VARIATION_COUNT;
use tally_core::models::MeasureRecord;

use crate::to_storage_err;

/// A project_measures row as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasureRow {
    pub id: i64,
    pub snapshot_id: i64,
    pub metric_id: i64,
    pub rule_id: Option<i64>,
    pub rule_priority: Option<String>,
    pub characteristic_id: Option<i64>,
    pub person_id: Option<i64>,
    pub value: Option<f64>,
    pub text_value: Option<String>,
    pub alert_status: Option<String>,
    pub alert_text: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub tendency: Option<i32>,
    pub variations: [Option<f64>; VARIATION_COUNT],
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

const SELECT_COLUMNS: &str = "SELECT id, snapshot_id, metric_id, rule_id, rule_priority,
        characteristic_id, person_id, value, text_value, alert_status, alert_text,
        description, url, tendency, variation_value_1, variation_value_2,
        variation_value_3, variation_value_4, variation_value_5, created_at, updated_at
    FROM project_measures";

/// Insert the measure row of `record` (not its spill-over data). Returns the row id.
pub fn insert_measure(conn: &Connection, record: &MeasureRecord) -> Result<i64, StorageError> {
    let [v1, v2, v3, v4, v5] = record.variations;
    conn.prepare_cached(
        "INSERT INTO project_measures (
            snapshot_id, metric_id, rule_id, rule_priority, characteristic_id, person_id,
            value, text_value, alert_status, alert_text, description, url, tendency,
            variation_value_1, variation_value_2, variation_value_3, variation_value_4,
            variation_value_5
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
    )
    .map_err(to_storage_err)?
    .execute(params![
        record.snapshot_id.get(),
        record.metric_id.get(),
        record.rule_id,
        record.rule_severity.map(|s| s.as_str()),
        record.characteristic_id,
        record.person_id,
        record.value,
        record.text_value,
        record.alert_status.map(|s| s.as_str()),
        record.alert_text,
        record.description,
        record.url,
        record.tendency,
        v1,
        v2,
        v3,
        v4,
        v5,
    ])
    .map_err(to_storage_err)?;
    Ok(conn.last_insert_rowid())
}

/// Overwrite every column of the row identified by `id`.
pub fn update_measure(
    conn: &Connection,
    id: i64,
    record: &MeasureRecord,
) -> Result<(), StorageError> {
    let [v1, v2, v3, v4, v5] = record.variations;
    let changed = conn
        .prepare_cached(
            "UPDATE project_measures SET
                snapshot_id = ?1, metric_id = ?2, rule_id = ?3, rule_priority = ?4,
                characteristic_id = ?5, person_id = ?6, value = ?7, text_value = ?8,
                alert_status = ?9, alert_text = ?10, description = ?11, url = ?12,
                tendency = ?13, variation_value_1 = ?14, variation_value_2 = ?15,
                variation_value_3 = ?16, variation_value_4 = ?17, variation_value_5 = ?18,
                updated_at = unixepoch()
             WHERE id = ?19",
        )
        .map_err(to_storage_err)?
        .execute(params![
            record.snapshot_id.get(),
            record.metric_id.get(),
            record.rule_id,
            record.rule_severity.map(|s| s.as_str()),
            record.characteristic_id,
            record.person_id,
            record.value,
            record.text_value,
            record.alert_status.map(|s| s.as_str()),
            record.alert_text,
            record.description,
            record.url,
            record.tendency,
            v1,
            v2,
            v3,
            v4,
            v5,
            id,
        ])
        .map_err(to_storage_err)?;

    if changed == 0 {
        return Err(StorageError::NotFound {
            entity: "measure",
            id: id.to_string(),
        });
    }
    Ok(())
}

pub fn get_measure(conn: &Connection, id: i64) -> Result<Option<MeasureRow>, StorageError> {
    conn.prepare_cached(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
        .map_err(to_storage_err)?
        .query_row(params![id], map_row)
        .optional()
        .map_err(to_storage_err)
}

/// All measures of a snapshot, in insertion order.
pub fn list_by_snapshot(
    conn: &Connection,
    snapshot_id: i64,
) -> Result<Vec<MeasureRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!("{SELECT_COLUMNS} WHERE snapshot_id = ?1 ORDER BY id"))
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![snapshot_id], map_row)
        .map_err(to_storage_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(to_storage_err)
}

/// Every measure in the table, in insertion order.
pub fn list_all(conn: &Connection) -> Result<Vec<MeasureRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!("{SELECT_COLUMNS} ORDER BY id"))
        .map_err(to_storage_err)?;
    let rows = stmt.query_map([], map_row).map_err(to_storage_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(to_storage_err)
}

pub fn count(conn: &Connection) -> Result<i64, StorageError> {
    conn.query_row("SELECT COUNT(*) FROM project_measures", [], |row| row.get(0))
        .map_err(to_storage_err)
}

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MeasureRow> {
    Ok(MeasureRow {
        id: row.get(0)?,
        snapshot_id: row.get(1)?,
        metric_id: row.get(2)?,
        rule_id: row.get(3)?,
        rule_priority: row.get(4)?,
        characteristic_id: row.get(5)?,
        person_id: row.get(6)?,
        value: row.get(7)?,
        text_value: row.get(8)?,
        alert_status: row.get(9)?,
        alert_text: row.get(10)?,
        description: row.get(11)?,
        url: row.get(12)?,
        tendency: row.get(13)?,
        variations: [
            row.get(14)?,
            row.get(15)?,
            row.get(16)?,
            row.get(17)?,
            row.get(18)?,
        ],
        created_at: row.get(19)?,
        updated_at: row.get(20)?,
    })
}
