//! Gap analysis result types.

use serde::Serialize;

use posture_core::types::{ControlStatus, RiskLevel};

/// One grouped gap: a control assessed as not (fully) implemented on at
/// least one of the product's systems.
#[derive(Debug, Clone, Serialize)]
pub struct GapEntry {
    pub control_id: i64,
    pub subcategory_code: String,
    pub name: String,
    /// Worst status observed (`NotImplemented` dominates `PartiallyImplemented`).
    pub status: ControlStatus,
    /// Highest risk observed across affected systems, falling back to
    /// the control's declared default risk.
    pub risk_level: RiskLevel,
    /// Distinct systems affected, not assessment count.
    pub systems_affected: usize,
}

/// Prioritized gap list with uncapped totals.
#[derive(Debug, Clone, Serialize)]
pub struct GapAnalysis {
    pub product_id: i64,
    /// True grouped-gap count, regardless of the display cap.
    pub total_gaps: usize,
    pub critical_gaps: usize,
    pub high_risk_gaps: usize,
    /// Sorted by risk priority then subcategory code, capped for display.
    pub gaps: Vec<GapEntry>,
}
