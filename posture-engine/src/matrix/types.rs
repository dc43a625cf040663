//! Matrix view types.

use serde::Serialize;

use posture_core::types::collections::FxHashMap;
use posture_core::types::{ControlStatus, RiskLevel, SystemNode};

/// One cell of the matrix.
///
/// A cell with no `assessment_id` is virtual: it was synthesized for
/// display and is not persisted until the user explicitly edits it.
#[derive(Debug, Clone, Serialize)]
pub struct MatrixCell {
    pub assessment_id: Option<i64>,
    pub status: ControlStatus,
    pub risk_level: Option<RiskLevel>,
}

impl MatrixCell {
    pub fn virtual_cell() -> Self {
        Self {
            assessment_id: None,
            status: ControlStatus::NotAssessed,
            risk_level: None,
        }
    }

    pub fn is_virtual(&self) -> bool {
        self.assessment_id.is_none()
    }
}

/// One row: a baseline control with a cell per system.
#[derive(Debug, Clone, Serialize)]
pub struct MatrixRow {
    pub control_id: i64,
    pub subcategory_code: String,
    pub name: String,
    pub function_code: String,
    pub category_code: String,
    /// Keyed by system id; every system column is present.
    pub cells: FxHashMap<i64, MatrixCell>,
}

/// The full controls × systems view for one product.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentMatrix {
    pub product_id: i64,
    /// Column order as supplied by the caller.
    pub systems: Vec<SystemNode>,
    /// Rows in baseline resolver order.
    pub rows: Vec<MatrixRow>,
}
