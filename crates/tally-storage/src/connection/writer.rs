//! Write connection utilities.

use rusqlite::{Connection, Transaction, TransactionBehavior};
use tally_core::errors::StorageError;

/// Run `f` inside a BEGIN IMMEDIATE transaction. The write lock is taken at
/// transaction start; any error rolls the whole transaction back.
///
/// Takes `&Connection` so it works through the manager's mutex guard.
pub fn with_immediate_transaction<F, T>(conn: &Connection, f: F) -> Result<T, StorageError>
where
    F: FnOnce(&Transaction<'_>) -> Result<T, StorageError>,
{
    // Dropping the transaction uncommitted rolls back.
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)
        .map_err(|e| StorageError::sqlite(format!("failed to begin immediate transaction: {e}")))?;

    let result = f(&tx)?;

    tx.commit()
        .map_err(|e| StorageError::sqlite(format!("failed to commit: {e}")))?;

    Ok(result)
}
