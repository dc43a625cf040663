//! Versioned schema migrations tracked via `PRAGMA user_version`.

pub mod v001_initial;

use posture_core::errors::StorageError;
use rusqlite::Connection;

struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: v001_initial::MIGRATION_SQL,
}];

/// Apply every migration newer than the database's recorded version.
pub fn run_migrations(conn: &Connection) -> Result<(), StorageError> {
    let current = user_version(conn)?;
    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        tracing::info!(version = migration.version, "applying migration");
        conn.execute_batch(migration.sql)
            .map_err(|e| StorageError::Migration {
                version: migration.version,
                message: e.to_string(),
            })?;
        conn.pragma_update(None, "user_version", migration.version)
            .map_err(|e| StorageError::Migration {
                version: migration.version,
                message: format!("record version: {e}"),
            })?;
    }
    Ok(())
}

fn user_version(conn: &Connection) -> Result<u32, StorageError> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| StorageError::Sqlite {
            message: e.to_string(),
        })
}

/// Schema version of an open database.
pub fn schema_version(conn: &Connection) -> Result<u32, StorageError> {
    user_version(conn)
}
