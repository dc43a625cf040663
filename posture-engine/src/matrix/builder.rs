//! Matrix construction.

use posture_core::types::collections::FxHashMap;
use posture_core::types::SystemNode;

use crate::baseline::ResolvedBaseline;
use crate::lookup::AssessmentIndex;

use super::types::{AssessmentMatrix, MatrixCell, MatrixRow};

/// Build the controls × systems matrix for one product.
///
/// Rows follow the resolved baseline order; columns follow the
/// caller-supplied system order. Pairs without an assessment row get a
/// virtual `NotAssessed` cell.
pub fn build(
    baseline: &ResolvedBaseline,
    systems: &[SystemNode],
    index: &AssessmentIndex,
) -> AssessmentMatrix {
    let rows = baseline
        .controls
        .iter()
        .map(|control| {
            let mut cells = FxHashMap::default();
            for system in systems {
                let cell = match index.get(system.system_id, control.control_id) {
                    Some(assessment) => MatrixCell {
                        assessment_id: Some(assessment.assessment_id),
                        status: assessment.status,
                        risk_level: assessment.risk_level,
                    },
                    None => MatrixCell::virtual_cell(),
                };
                cells.insert(system.system_id, cell);
            }
            MatrixRow {
                control_id: control.control_id,
                subcategory_code: control.subcategory_code.clone(),
                name: control.name.clone(),
                function_code: control.function_code.clone(),
                category_code: control.category_code.clone(),
                cells,
            }
        })
        .collect();

    AssessmentMatrix {
        product_id: baseline.product_id,
        systems: systems.to_vec(),
        rows,
    }
}
