//! Assessment and baseline records.

use serde::{Deserialize, Serialize};

use super::status::{ControlStatus, RiskLevel};

/// One (product, control) baseline row. At most one per pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineEntry {
    pub product_id: i64,
    pub control_id: i64,
    pub applicable: bool,
    /// Optional priority tier set when the baseline was configured.
    pub priority: Option<u8>,
}

/// One (system, control) assessment row. At most one per pair;
/// absence of a row is equivalent to `ControlStatus::NotAssessed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    pub assessment_id: i64,
    pub system_id: i64,
    pub control_id: i64,
    pub status: ControlStatus,
    pub risk_level: Option<RiskLevel>,
    pub notes: Option<String>,
    pub evidence: Option<String>,
    pub remediation_plan: Option<String>,
}

/// An unsaved assessment edit. Used both for creates and for updates;
/// the store decides which branch applies by row presence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentDraft {
    pub system_id: i64,
    pub control_id: i64,
    pub status: ControlStatus,
    pub risk_level: Option<RiskLevel>,
    pub notes: Option<String>,
    pub evidence: Option<String>,
    pub remediation_plan: Option<String>,
}

impl AssessmentDraft {
    /// The (system, control) pair this draft targets.
    pub fn key(&self) -> (i64, i64) {
        (self.system_id, self.control_id)
    }
}

/// Provider-side query filter for assessment reads.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssessmentFilter {
    pub system_id: Option<i64>,
    pub product_id: Option<i64>,
}

impl AssessmentFilter {
    pub fn for_system(system_id: i64) -> Self {
        Self {
            system_id: Some(system_id),
            ..Self::default()
        }
    }

    pub fn for_product(product_id: i64) -> Self {
        Self {
            product_id: Some(product_id),
            ..Self::default()
        }
    }
}
