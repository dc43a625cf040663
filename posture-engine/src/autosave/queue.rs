//! Autosave queue — cancellable coalescing tasks over an injected clock.
//!
//! Rapid edits to the same (system, control) pair coalesce into one
//! write after the quiet period. A newer edit supersedes the pending
//! one and restarts the timer; a manual save flushes immediately. No
//! wall-clock timers: the host drives `drain_due` from its event loop
//! and tests drive it from a manual clock.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use posture_core::traits::Clock;
use posture_core::types::collections::FxHashMap;
use posture_core::types::AssessmentDraft;

struct PendingSave {
    draft: AssessmentDraft,
    due_at_ms: u64,
}

pub struct AutosaveQueue {
    clock: Arc<dyn Clock>,
    quiet_ms: u64,
    pending: Mutex<FxHashMap<(i64, i64), PendingSave>>,
}

impl AutosaveQueue {
    pub fn new(clock: Arc<dyn Clock>, quiet_ms: u64) -> Self {
        Self {
            clock,
            quiet_ms,
            pending: Mutex::new(FxHashMap::default()),
        }
    }

    fn pending(&self) -> MutexGuard<'_, FxHashMap<(i64, i64), PendingSave>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue an edit. Replaces any pending edit for the same pair and
    /// restarts its quiet period.
    pub fn schedule(&self, draft: AssessmentDraft) {
        let due_at_ms = self.clock.now_ms() + self.quiet_ms;
        self.pending()
            .insert(draft.key(), PendingSave { draft, due_at_ms });
    }

    /// Cancel a pending edit without writing it.
    pub fn cancel(&self, key: (i64, i64)) -> Option<AssessmentDraft> {
        self.pending().remove(&key).map(|p| p.draft)
    }

    /// Manual save: cancel the timer and hand the draft back for an
    /// immediate write.
    pub fn flush(&self, key: (i64, i64)) -> Option<AssessmentDraft> {
        self.cancel(key)
    }

    /// Drain every draft whose quiet period has elapsed.
    pub fn drain_due(&self) -> Vec<AssessmentDraft> {
        let now = self.clock.now_ms();
        let mut pending = self.pending();
        let due_keys: Vec<(i64, i64)> = pending
            .iter()
            .filter(|(_, p)| p.due_at_ms <= now)
            .map(|(&k, _)| k)
            .collect();
        let mut due: Vec<AssessmentDraft> = due_keys
            .into_iter()
            .filter_map(|k| pending.remove(&k).map(|p| p.draft))
            .collect();
        // Deterministic write order.
        due.sort_by_key(AssessmentDraft::key);
        due
    }

    pub fn pending_count(&self) -> usize {
        self.pending().len()
    }
}
