//! Connection pragmas.

use posture_core::errors::StorageError;
use rusqlite::Connection;

/// Pragmas for the write connection: WAL journaling, foreign keys on,
/// and a busy timeout so a contended write waits instead of failing.
pub fn apply_pragmas(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;
         PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = 5000;",
    )
    .map_err(|e| StorageError::Sqlite {
        message: format!("apply pragmas: {e}"),
    })
}

/// Pragmas for pooled read connections.
pub fn apply_read_pragmas(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "PRAGMA query_only = ON;
         PRAGMA busy_timeout = 5000;",
    )
    .map_err(|e| StorageError::Sqlite {
        message: format!("apply read pragmas: {e}"),
    })
}
