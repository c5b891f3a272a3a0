//! Queries for the rules table.

use rusqlite::{params, Connection, OptionalExtension};
use tally_core::errors::StorageError;
use tally_core::models::Rule;

use crate::to_storage_err;

pub fn insert_rule(
    conn: &Connection,
    repository: &str,
    rule_key: &str,
    name: Option<&str>,
) -> Result<i64, StorageError> {
    conn.execute(
        "INSERT INTO rules (repository, rule_key, name) VALUES (?1, ?2, ?3)",
        params![repository, rule_key, name],
    )
    .map_err(to_storage_err)?;
    Ok(conn.last_insert_rowid())
}

pub fn find_by_key(
    conn: &Connection,
    repository: &str,
    rule_key: &str,
) -> Result<Option<Rule>, StorageError> {
    conn.prepare_cached(
        "SELECT id, repository, rule_key, name FROM rules
         WHERE repository = ?1 AND rule_key = ?2",
    )
    .map_err(to_storage_err)?
    .query_row(params![repository, rule_key], |row| {
        Ok(Rule {
            id: row.get(0)?,
            repository: row.get(1)?,
            key: row.get(2)?,
            name: row.get(3)?,
        })
    })
    .optional()
    .map_err(to_storage_err)
}
