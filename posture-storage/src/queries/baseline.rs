//! Queries for baseline_entries.

use posture_core::errors::StorageError;
use posture_core::types::BaselineEntry;
use rusqlite::{params, Connection};

use super::sqlite_err;

/// Insert or update one (product, control) baseline row.
pub fn upsert_entry(conn: &Connection, entry: &BaselineEntry) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO baseline_entries (product_id, control_id, applicable, priority)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT (product_id, control_id)
         DO UPDATE SET applicable = excluded.applicable, priority = excluded.priority",
        params![
            entry.product_id,
            entry.control_id,
            entry.applicable as i64,
            entry.priority,
        ],
    )
    .map_err(sqlite_err)?;
    Ok(())
}

pub fn delete_for_product(conn: &Connection, product_id: i64) -> Result<usize, StorageError> {
    conn.execute(
        "DELETE FROM baseline_entries WHERE product_id = ?1",
        params![product_id],
    )
    .map_err(sqlite_err)
}

/// All baseline rows for a product, applicable or not.
pub fn query_for_product(
    conn: &Connection,
    product_id: i64,
) -> Result<Vec<BaselineEntry>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT product_id, control_id, applicable, priority
             FROM baseline_entries WHERE product_id = ?1
             ORDER BY control_id",
        )
        .map_err(sqlite_err)?;

    let rows = stmt
        .query_map(params![product_id], |row| {
            Ok(BaselineEntry {
                product_id: row.get(0)?,
                control_id: row.get(1)?,
                applicable: row.get::<_, i64>(2)? != 0,
                priority: row.get(3)?,
            })
        })
        .map_err(sqlite_err)?;

    rows.collect::<Result<Vec<_>, _>>().map_err(sqlite_err)
}
