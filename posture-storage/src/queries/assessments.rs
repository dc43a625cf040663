//! Queries for the assessments table.

use posture_core::errors::StorageError;
use posture_core::types::{Assessment, AssessmentDraft, AssessmentFilter, ControlStatus};
use rusqlite::{params, Connection, Row};

use super::sqlite_err;

const COLUMNS: &str = "assessment_id, system_id, control_id, status, risk_level,
                       notes, evidence, remediation_plan";

fn map_row(row: &Row<'_>) -> Result<Assessment, rusqlite::Error> {
    let status: String = row.get(3)?;
    let risk: Option<String> = row.get(4)?;
    Ok(Assessment {
        assessment_id: row.get(0)?,
        system_id: row.get(1)?,
        control_id: row.get(2)?,
        status: parse_status(3, &status)?,
        risk_level: risk
            .as_deref()
            .map(|r| super::controls::parse_risk(4, r))
            .transpose()?,
        notes: row.get(5)?,
        evidence: row.get(6)?,
        remediation_plan: row.get(7)?,
    })
}

fn parse_status(column: usize, raw: &str) -> Result<ControlStatus, rusqlite::Error> {
    raw.parse().map_err(|e: String| {
        rusqlite::Error::FromSqlConversionFailure(
            column,
            rusqlite::types::Type::Text,
            e.into(),
        )
    })
}

/// Insert a new row. Fails on an existing (system, control) pair — the
/// UNIQUE constraint enforces at-most-one row per pair.
pub fn insert(conn: &Connection, draft: &AssessmentDraft) -> Result<Assessment, StorageError> {
    conn.execute(
        "INSERT INTO assessments (
            system_id, control_id, status, risk_level, notes, evidence, remediation_plan
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            draft.system_id,
            draft.control_id,
            draft.status.as_str(),
            draft.risk_level.map(|r| r.as_str()),
            draft.notes,
            draft.evidence,
            draft.remediation_plan,
        ],
    )
    .map_err(sqlite_err)?;
    Ok(Assessment {
        assessment_id: conn.last_insert_rowid(),
        system_id: draft.system_id,
        control_id: draft.control_id,
        status: draft.status,
        risk_level: draft.risk_level,
        notes: draft.notes.clone(),
        evidence: draft.evidence.clone(),
        remediation_plan: draft.remediation_plan.clone(),
    })
}

/// Update an existing row in place.
pub fn update(
    conn: &Connection,
    assessment_id: i64,
    draft: &AssessmentDraft,
) -> Result<Assessment, StorageError> {
    let affected = conn
        .execute(
            "UPDATE assessments SET
                status = ?1, risk_level = ?2, notes = ?3, evidence = ?4,
                remediation_plan = ?5, updated_at = unixepoch()
             WHERE assessment_id = ?6",
            params![
                draft.status.as_str(),
                draft.risk_level.map(|r| r.as_str()),
                draft.notes,
                draft.evidence,
                draft.remediation_plan,
                assessment_id,
            ],
        )
        .map_err(sqlite_err)?;
    if affected == 0 {
        return Err(StorageError::NotFound {
            what: format!("assessment {assessment_id}"),
        });
    }
    query_by_id(conn, assessment_id)?.ok_or(StorageError::NotFound {
        what: format!("assessment {assessment_id}"),
    })
}

pub fn delete(conn: &Connection, assessment_id: i64) -> Result<bool, StorageError> {
    let affected = conn
        .execute(
            "DELETE FROM assessments WHERE assessment_id = ?1",
            params![assessment_id],
        )
        .map_err(sqlite_err)?;
    Ok(affected > 0)
}

pub fn query_by_id(
    conn: &Connection,
    assessment_id: i64,
) -> Result<Option<Assessment>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {COLUMNS} FROM assessments WHERE assessment_id = ?1"
        ))
        .map_err(sqlite_err)?;
    let mut rows = stmt
        .query_map(params![assessment_id], map_row)
        .map_err(sqlite_err)?;
    rows.next().transpose().map_err(sqlite_err)
}

/// Rows matching the filter: one system, every system of a product, or
/// everything.
pub fn query(
    conn: &Connection,
    filter: &AssessmentFilter,
) -> Result<Vec<Assessment>, StorageError> {
    if let Some(system_id) = filter.system_id {
        let mut stmt = conn
            .prepare_cached(&format!(
                "SELECT {COLUMNS} FROM assessments WHERE system_id = ?1
                 ORDER BY assessment_id"
            ))
            .map_err(sqlite_err)?;
        let rows = stmt
            .query_map(params![system_id], map_row)
            .map_err(sqlite_err)?;
        return rows.collect::<Result<Vec<_>, _>>().map_err(sqlite_err);
    }
    if let Some(product_id) = filter.product_id {
        let mut stmt = conn
            .prepare_cached(&format!(
                "SELECT a.assessment_id, a.system_id, a.control_id, a.status,
                        a.risk_level, a.notes, a.evidence, a.remediation_plan
                 FROM assessments a
                 JOIN systems s ON s.system_id = a.system_id
                 WHERE s.product_id = ?1
                 ORDER BY a.assessment_id"
            ))
            .map_err(sqlite_err)?;
        let rows = stmt
            .query_map(params![product_id], map_row)
            .map_err(sqlite_err)?;
        return rows.collect::<Result<Vec<_>, _>>().map_err(sqlite_err);
    }
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {COLUMNS} FROM assessments ORDER BY assessment_id"
        ))
        .map_err(sqlite_err)?;
    let rows = stmt.query_map([], map_row).map_err(sqlite_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sqlite_err)
}
