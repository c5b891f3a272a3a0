//! ReadPool: round-robin read-only connections.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use rusqlite::{Connection, OpenFlags};
use tally_core::errors::StorageError;

use super::pragmas::apply_read_pragmas;
use crate::to_storage_err;

const MAX_POOL_SIZE: usize = 8;

/// A fixed set of read-only connections handed out in turn.
pub struct ReadPool {
    connections: Vec<Mutex<Connection>>,
    next: AtomicUsize,
}

impl ReadPool {
    /// Open `pool_size` read-only connections to `path`, clamped to
    /// `1..=8`, each with the read pragmas applied.
    pub fn open(path: &Path, pool_size: usize, busy_timeout_ms: u64) -> Result<Self, StorageError> {
        let size = pool_size.clamp(1, MAX_POOL_SIZE);
        let mut connections = Vec::with_capacity(size);
        for _ in 0..size {
            let conn = Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )
            .map_err(to_storage_err)?;
            apply_read_pragmas(&conn, busy_timeout_ms)?;
            connections.push(Mutex::new(conn));
        }
        Ok(Self {
            connections,
            next: AtomicUsize::new(0),
        })
    }

    /// Run `f` on the next connection in round-robin order, holding its lock
    /// for the duration of the call.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        let idx = self.next.fetch_add(1, Ordering::Relaxed) % self.connections.len();
        let guard = self.connections[idx]
            .lock()
            .map_err(|_| StorageError::sqlite("read pool lock poisoned"))?;
        f(&guard)
    }

    /// Number of connections actually opened.
    pub fn size(&self) -> usize {
        self.connections.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn database(dir: &tempfile::TempDir) -> std::path::PathBuf {
        let path = dir.path().join("pool.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch("CREATE TABLE t (x INTEGER); INSERT INTO t VALUES (7);")
            .unwrap();
        path
    }

    #[test]
    fn size_is_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = database(&dir);
        assert_eq!(ReadPool::open(&path, 0, 100).unwrap().size(), 1);
        assert_eq!(ReadPool::open(&path, 3, 100).unwrap().size(), 3);
        assert_eq!(ReadPool::open(&path, 64, 100).unwrap().size(), MAX_POOL_SIZE);
    }

    #[test]
    fn connections_are_read_only() {
        let dir = tempfile::tempdir().unwrap();
        let pool = ReadPool::open(&database(&dir), 2, 100).unwrap();

        for _ in 0..pool.size() {
            let x: i64 = pool
                .with_conn(|conn| {
                    conn.query_row("SELECT x FROM t", [], |row| row.get(0))
                        .map_err(to_storage_err)
                })
                .unwrap();
            assert_eq!(x, 7);
        }
        let write = pool.with_conn(|conn| {
            conn.execute("INSERT INTO t VALUES (8)", []).map_err(to_storage_err)
        });
        assert!(write.is_err());
    }
}
