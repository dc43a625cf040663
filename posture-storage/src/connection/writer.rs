//! Write connection utilities — BEGIN IMMEDIATE transactions.

use posture_core::errors::StorageError;
use rusqlite::{Connection, Transaction, TransactionBehavior};

/// Execute a multi-statement write inside a BEGIN IMMEDIATE
/// transaction. The write lock is taken at transaction start, so a
/// concurrent reader cannot promote and hit SQLITE_BUSY mid-write.
/// An error from the closure rolls the transaction back on drop.
pub fn with_immediate_transaction<F, T>(conn: &Connection, f: F) -> Result<T, StorageError>
where
    F: FnOnce(&Transaction<'_>) -> Result<T, StorageError>,
{
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate).map_err(|e| {
        StorageError::Sqlite {
            message: format!("begin immediate: {e}"),
        }
    })?;

    let result = f(&tx)?;

    tx.commit().map_err(|e| StorageError::Sqlite {
        message: format!("commit: {e}"),
    })?;

    Ok(result)
}
