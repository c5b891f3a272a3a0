//! Schema migrations, tracked with `PRAGMA user_version`.

pub mod v001_initial;

use rusqlite::Connection;
use tally_core::errors::StorageError;

use crate::to_storage_err;

/// Ordered (version, SQL) pairs. Each entry is applied once.
const MIGRATIONS: &[(u32, &str)] = &[(1, v001_initial::MIGRATION_SQL)];

/// Latest schema version this build knows about.
pub const LATEST_VERSION: u32 = 1;

/// Apply every migration newer than the database's current version.
pub fn run_migrations(conn: &Connection) -> Result<(), StorageError> {
    let current = current_version(conn)?;
    for &(version, sql) in MIGRATIONS.iter().filter(|(v, _)| *v > current) {
        conn.execute_batch(&format!("BEGIN;\n{sql}\nPRAGMA user_version = {version};\nCOMMIT;"))
            .map_err(|e| {
                let _ = conn.execute_batch("ROLLBACK;");
                StorageError::MigrationFailed {
                    version,
                    reason: e.to_string(),
                }
            })?;
        tracing::info!(version, "applied schema migration");
    }
    Ok(())
}

pub fn current_version(conn: &Connection) -> Result<u32, StorageError> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(to_storage_err)
}
