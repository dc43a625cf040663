//! Event payload types.

use crate::types::ControlStatus;

/// Payload for `on_assessment_saved`.
#[derive(Debug, Clone)]
pub struct AssessmentSavedEvent {
    pub assessment_id: i64,
    pub system_id: i64,
    pub control_id: i64,
    pub status: ControlStatus,
    /// True if the save created a new row rather than updating one.
    pub created: bool,
}

/// Payload for `on_assessment_deleted`.
#[derive(Debug, Clone)]
pub struct AssessmentDeletedEvent {
    pub assessment_id: i64,
    pub system_id: i64,
    pub control_id: i64,
}

/// Payload for `on_baseline_changed`.
#[derive(Debug, Clone)]
pub struct BaselineChangedEvent {
    pub product_id: i64,
    pub entry_count: usize,
}

/// Payload for `on_system_changed`.
#[derive(Debug, Clone)]
pub struct SystemChangedEvent {
    pub system_id: i64,
    pub product_id: i64,
}

/// Payload for `on_views_invalidated`.
#[derive(Debug, Clone)]
pub struct ViewsInvalidatedEvent {
    /// Short mutation description, e.g. "assessment-write".
    pub mutation: &'static str,
    pub topic_count: usize,
}

/// Payload for `on_rollup_completed`.
#[derive(Debug, Clone)]
pub struct RollupCompletedEvent {
    pub generation: u64,
    pub centre_count: usize,
    pub system_count: usize,
}

/// Payload for `on_rollup_superseded`. The discarded result was computed
/// against `stale_generation`; `current_generation` made it obsolete.
#[derive(Debug, Clone)]
pub struct RollupSupersededEvent {
    pub stale_generation: u64,
    pub current_generation: u64,
}

/// Payload for `on_write_failed`.
#[derive(Debug, Clone)]
pub struct WriteFailedEvent {
    pub system_id: i64,
    pub control_id: i64,
    pub message: String,
    pub retryable: bool,
}
