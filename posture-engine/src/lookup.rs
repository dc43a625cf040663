//! Assessment lookup — O(1) retrieval by (system, control).

use posture_core::types::collections::FxHashMap;
use posture_core::types::{Assessment, ControlStatus};

/// Index over raw assessment rows keyed by (system_id, control_id).
///
/// At most one row exists per pair; a missing pair reads as
/// `NotAssessed`.
#[derive(Debug, Default)]
pub struct AssessmentIndex {
    by_key: FxHashMap<(i64, i64), Assessment>,
}

impl AssessmentIndex {
    pub fn from_records(records: Vec<Assessment>) -> Self {
        let mut by_key = FxHashMap::default();
        for record in records {
            by_key.insert((record.system_id, record.control_id), record);
        }
        Self { by_key }
    }

    pub fn get(&self, system_id: i64, control_id: i64) -> Option<&Assessment> {
        self.by_key.get(&(system_id, control_id))
    }

    /// Status for a pair, treating absence as `NotAssessed`.
    pub fn status(&self, system_id: i64, control_id: i64) -> ControlStatus {
        self.get(system_id, control_id)
            .map(|a| a.status)
            .unwrap_or(ControlStatus::NotAssessed)
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}
