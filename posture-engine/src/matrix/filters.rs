//! Matrix row filters.
//!
//! Three independent filters applied as successive set-intersections
//! over rows. The underlying matrix is never mutated; filtering
//! borrows rows.

use posture_core::types::ControlStatus;

use super::types::{AssessmentMatrix, MatrixRow};

/// Filter criteria. `None` fields match everything.
#[derive(Debug, Clone, Default)]
pub struct MatrixFilter {
    /// Exact function code, e.g. `PR`.
    pub function_code: Option<String>,
    /// Row matches if any cell carries this status.
    pub status: Option<ControlStatus>,
    /// Case-insensitive free text over subcategory code and name.
    pub search: Option<String>,
}

impl MatrixFilter {
    /// Apply all configured filters, returning borrowed matching rows.
    pub fn apply<'a>(&self, matrix: &'a AssessmentMatrix) -> Vec<&'a MatrixRow> {
        let mut rows: Vec<&MatrixRow> = matrix.rows.iter().collect();

        if let Some(function_code) = &self.function_code {
            rows.retain(|row| &row.function_code == function_code);
        }

        if let Some(status) = self.status {
            rows.retain(|row| row.cells.values().any(|cell| cell.status == status));
        }

        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            rows.retain(|row| {
                row.subcategory_code.to_lowercase().contains(&needle)
                    || row.name.to_lowercase().contains(&needle)
            });
        }

        rows
    }
}
