//! Gap analyzer — flat emit, keyed grouping, priority sort, display cap.

use posture_core::types::collections::FxHashMap;
use posture_core::types::{Control, ControlStatus, RiskLevel, SystemNode};

use crate::baseline::ResolvedBaseline;
use crate::lookup::AssessmentIndex;

use super::types::{GapAnalysis, GapEntry};

struct GapGroup {
    status: ControlStatus,
    observed_risk: Option<RiskLevel>,
    systems_affected: usize,
}

/// Analyze gaps for one product.
///
/// For every (system, applicable control) pair with a gap status, the
/// control contributes one grouped entry carrying the distinct affected
/// system count and the highest observed risk. `cap` limits the
/// returned list; the totals are always uncapped.
pub fn analyze(
    baseline: &ResolvedBaseline,
    systems: &[SystemNode],
    index: &AssessmentIndex,
    cap: usize,
) -> GapAnalysis {
    let mut groups: FxHashMap<i64, GapGroup> = FxHashMap::default();

    for system in systems {
        for control in &baseline.controls {
            let Some(assessment) = index.get(system.system_id, control.control_id) else {
                continue;
            };
            if !assessment.status.is_gap() {
                continue;
            }
            let group = groups.entry(control.control_id).or_insert(GapGroup {
                status: assessment.status,
                observed_risk: None,
                systems_affected: 0,
            });
            group.systems_affected += 1;
            if assessment.status == ControlStatus::NotImplemented {
                group.status = ControlStatus::NotImplemented;
            }
            if let Some(risk) = assessment.risk_level {
                group.observed_risk = Some(match group.observed_risk {
                    Some(existing) => existing.max(risk),
                    None => risk,
                });
            }
        }
    }

    let mut entries: Vec<GapEntry> = baseline
        .controls
        .iter()
        .filter_map(|control| groups.remove(&control.control_id).map(|g| to_entry(control, g)))
        .collect();

    entries.sort_by(|a, b| {
        a.risk_level
            .priority_rank()
            .cmp(&b.risk_level.priority_rank())
            .then_with(|| a.subcategory_code.cmp(&b.subcategory_code))
    });

    let total_gaps = entries.len();
    let critical_gaps = entries
        .iter()
        .filter(|e| e.risk_level == RiskLevel::Critical)
        .count();
    let high_risk_gaps = entries
        .iter()
        .filter(|e| e.risk_level == RiskLevel::High)
        .count();
    entries.truncate(cap);

    GapAnalysis {
        product_id: baseline.product_id,
        total_gaps,
        critical_gaps,
        high_risk_gaps,
        gaps: entries,
    }
}

fn to_entry(control: &Control, group: GapGroup) -> GapEntry {
    GapEntry {
        control_id: control.control_id,
        subcategory_code: control.subcategory_code.clone(),
        name: control.name.clone(),
        status: group.status,
        risk_level: group.observed_risk.unwrap_or(control.default_risk),
        systems_affected: group.systems_affected,
    }
}
