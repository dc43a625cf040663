//! Event handler trait with no-op defaults.

use super::types::*;

/// Receiver for engine lifecycle events.
///
/// Every method has a no-op default so handlers implement only what
/// they care about. Handlers must not block; dispatch is synchronous.
pub trait PostureEventHandler: Send + Sync {
    fn on_assessment_saved(&self, event: &AssessmentSavedEvent) {
        let _ = event;
    }

    fn on_assessment_deleted(&self, event: &AssessmentDeletedEvent) {
        let _ = event;
    }

    fn on_baseline_changed(&self, event: &BaselineChangedEvent) {
        let _ = event;
    }

    fn on_system_changed(&self, event: &SystemChangedEvent) {
        let _ = event;
    }

    fn on_views_invalidated(&self, event: &ViewsInvalidatedEvent) {
        let _ = event;
    }

    fn on_rollup_completed(&self, event: &RollupCompletedEvent) {
        let _ = event;
    }

    fn on_rollup_superseded(&self, event: &RollupSupersededEvent) {
        let _ = event;
    }

    fn on_write_failed(&self, event: &WriteFailedEvent) {
        let _ = event;
    }
}
