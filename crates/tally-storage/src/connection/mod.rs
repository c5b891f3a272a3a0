//! Connection management: write-serialized + read-pooled.

pub mod pool;
pub mod pragmas;
pub mod writer;

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rusqlite::Connection;
use tally_core::config::StorageConfig;
use tally_core::errors::StorageError;

use self::pool::ReadPool;
use self::pragmas::apply_pragmas;
use crate::{migrations, to_storage_err};

/// Owns the single write connection and, for file-backed databases, the
/// read connection pool.
///
/// In-memory databases cannot be shared between connections, so there all
/// reads go through the writer.
pub struct DatabaseManager {
    writer: Mutex<Connection>,
    readers: Option<ReadPool>,
    path: Option<PathBuf>,
}

impl DatabaseManager {
    /// Open a database at the given path, apply pragmas, run migrations.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        Self::open_with(path, &StorageConfig::default())
    }

    /// Like `open`, with busy timeout and read pool size taken from `config`.
    pub fn open_with(path: &Path, config: &StorageConfig) -> Result<Self, StorageError> {
        let busy_timeout_ms = config.effective_busy_timeout_ms();
        let writer = Connection::open(path).map_err(to_storage_err)?;
        apply_pragmas(&writer, busy_timeout_ms)?;
        migrations::run_migrations(&writer)?;

        let readers = ReadPool::open(path, config.effective_read_pool_size(), busy_timeout_ms)?;
        tracing::debug!(path = %path.display(), readers = readers.size(), "database opened");

        Ok(Self {
            writer: Mutex::new(writer),
            readers: Some(readers),
            path: Some(path.to_path_buf()),
        })
    }

    /// Open the database named by `config.path`, or an in-memory one.
    pub fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        match config.path.as_deref() {
            Some(path) => Self::open_with(Path::new(path), config),
            None => Self::open_in_memory(),
        }
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let writer = Connection::open_in_memory().map_err(to_storage_err)?;
        apply_pragmas(&writer, StorageConfig::default().effective_busy_timeout_ms())?;
        migrations::run_migrations(&writer)?;

        Ok(Self {
            writer: Mutex::new(writer),
            readers: None,
            path: None,
        })
    }

    /// Execute a write operation with the serialized writer connection.
    pub fn with_writer<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        let guard = self
            .writer
            .lock()
            .map_err(|_| StorageError::sqlite("write lock poisoned"))?;
        f(&guard)
    }

    /// Execute a read operation with a pooled read connection.
    pub fn with_reader<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        match &self.readers {
            Some(readers) => readers.with_conn(f),
            None => self.with_writer(f),
        }
    }

    /// Run a WAL checkpoint (TRUNCATE mode), typically after a batch completes.
    pub fn checkpoint(&self) -> Result<(), StorageError> {
        self.with_writer(|conn| {
            conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")
                .map_err(to_storage_err)
        })
    }

    /// Database file path (`None` for in-memory).
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
