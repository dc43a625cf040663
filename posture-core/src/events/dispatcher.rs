//! EventDispatcher — synchronous event dispatch with zero overhead when empty.

use std::sync::Arc;

use super::handler::PostureEventHandler;
use super::types::*;

/// Synchronous event dispatcher wrapping a list of handlers.
///
/// When no handlers are registered, `emit` iterates over an empty Vec —
/// effectively zero cost.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn PostureEventHandler>>,
}

impl EventDispatcher {
    /// Create a new empty dispatcher.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Register an event handler.
    pub fn register(&mut self, handler: Arc<dyn PostureEventHandler>) {
        self.handlers.push(handler);
    }

    /// Returns the number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Emit an event to all registered handlers.
    /// Handlers that panic are isolated and do not prevent subsequent
    /// handlers from receiving the event.
    fn emit<F: Fn(&dyn PostureEventHandler)>(&self, f: F) {
        for handler in &self.handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                f(handler.as_ref());
            }));
            if result.is_err() {
                tracing::warn!("event handler panicked; continuing dispatch");
            }
        }
    }

    // ---- Mutations ----
    pub fn emit_assessment_saved(&self, event: &AssessmentSavedEvent) {
        self.emit(|h| h.on_assessment_saved(event));
    }

    pub fn emit_assessment_deleted(&self, event: &AssessmentDeletedEvent) {
        self.emit(|h| h.on_assessment_deleted(event));
    }

    pub fn emit_baseline_changed(&self, event: &BaselineChangedEvent) {
        self.emit(|h| h.on_baseline_changed(event));
    }

    pub fn emit_system_changed(&self, event: &SystemChangedEvent) {
        self.emit(|h| h.on_system_changed(event));
    }

    // ---- Cache lifecycle ----
    pub fn emit_views_invalidated(&self, event: &ViewsInvalidatedEvent) {
        self.emit(|h| h.on_views_invalidated(event));
    }

    // ---- Rollup lifecycle ----
    pub fn emit_rollup_completed(&self, event: &RollupCompletedEvent) {
        self.emit(|h| h.on_rollup_completed(event));
    }

    pub fn emit_rollup_superseded(&self, event: &RollupSupersededEvent) {
        self.emit(|h| h.on_rollup_superseded(event));
    }

    // ---- Failures ----
    pub fn emit_write_failed(&self, event: &WriteFailedEvent) {
        self.emit(|h| h.on_write_failed(event));
    }
}
