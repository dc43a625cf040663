//! Queries for the controls reference table.

use posture_core::errors::StorageError;
use posture_core::types::{Control, RiskLevel};
use rusqlite::{params, Connection};

use super::sqlite_err;

/// Insert one control. The dataset is loaded once; an existing id is
/// replaced so a re-import is idempotent.
pub fn insert_control(conn: &Connection, control: &Control) -> Result<(), StorageError> {
    conn.execute(
        "INSERT OR REPLACE INTO controls (
            control_id, subcategory_code, name, function_code, function_name,
            function_order, category_code, category_name, default_risk
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            control.control_id,
            control.subcategory_code,
            control.name,
            control.function_code,
            control.function_name,
            control.function_order,
            control.category_code,
            control.category_name,
            control.default_risk.as_str(),
        ],
    )
    .map_err(sqlite_err)?;
    Ok(())
}

/// All controls in framework display order.
pub fn query_all(conn: &Connection) -> Result<Vec<Control>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT control_id, subcategory_code, name, function_code, function_name,
                    function_order, category_code, category_name, default_risk
             FROM controls
             ORDER BY function_order, category_code, subcategory_code",
        )
        .map_err(sqlite_err)?;

    let rows = stmt
        .query_map([], |row| {
            let risk: String = row.get(8)?;
            Ok(Control {
                control_id: row.get(0)?,
                subcategory_code: row.get(1)?,
                name: row.get(2)?,
                function_code: row.get(3)?,
                function_name: row.get(4)?,
                function_order: row.get(5)?,
                category_code: row.get(6)?,
                category_name: row.get(7)?,
                default_risk: parse_risk(8, &risk)?,
            })
        })
        .map_err(sqlite_err)?;

    rows.collect::<Result<Vec<_>, _>>().map_err(sqlite_err)
}

pub fn count(conn: &Connection) -> Result<i64, StorageError> {
    conn.query_row("SELECT COUNT(*) FROM controls", [], |row| row.get(0))
        .map_err(sqlite_err)
}

pub(crate) fn parse_risk(column: usize, raw: &str) -> Result<RiskLevel, rusqlite::Error> {
    raw.parse().map_err(|e: String| {
        rusqlite::Error::FromSqlConversionFailure(
            column,
            rusqlite::types::Type::Text,
            e.into(),
        )
    })
}
