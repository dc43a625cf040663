//! Optimistic mutation guard — snapshot, apply, commit-or-revert.
//!
//! Every write runs inside this explicit state machine instead of ad
//! hoc try/catch: the guard snapshots the cached views it may touch,
//! lets the caller apply a speculative value, and either commits (the
//! mutation is recorded and dependents go stale for lazy recompute) or
//! reverts (snapshots restored, server state untouched). Dropping a
//! pending guard reverts, so an early `?` return cannot leak a
//! speculative value into the cache.

use super::coordinator::{CacheCoordinator, CachedEntry};
use super::topic::{Mutation, Topic};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GuardState {
    Pending,
    Committed,
    Reverted,
}

pub struct OptimisticMutation<'a> {
    coordinator: &'a CacheCoordinator,
    snapshots: Vec<(Topic, Option<CachedEntry>)>,
    state: GuardState,
}

impl<'a> OptimisticMutation<'a> {
    /// Begin a mutation covering the given topics.
    pub fn begin(coordinator: &'a CacheCoordinator, mutation: &Mutation) -> Self {
        let snapshots = mutation
            .invalidates()
            .into_iter()
            .map(|topic| {
                let entry = coordinator.snapshot(&topic);
                (topic, entry)
            })
            .collect();
        Self {
            coordinator,
            snapshots,
            state: GuardState::Pending,
        }
    }

    /// Speculatively replace one covered view before the write is
    /// confirmed.
    pub fn apply<T: Send + Sync + 'static>(&self, topic: Topic, value: T) {
        debug_assert!(
            self.snapshots.iter().any(|(t, _)| *t == topic),
            "speculative apply outside the mutation's topic set"
        );
        self.coordinator.apply_speculative(topic, value);
    }

    /// The write was confirmed: record the mutation so every dependent
    /// view (including the speculative one) is recomputed lazily.
    pub fn commit(mut self, mutation: &Mutation) -> u64 {
        self.state = GuardState::Committed;
        self.coordinator.record_mutation(mutation)
    }

    /// The write failed: restore every snapshot. Server state is
    /// unchanged, so prior valid caches remain correct.
    pub fn revert(mut self) {
        self.restore_snapshots();
        self.state = GuardState::Reverted;
    }

    fn restore_snapshots(&mut self) {
        for (topic, snapshot) in self.snapshots.drain(..) {
            self.coordinator.restore(topic, snapshot);
        }
    }
}

impl Drop for OptimisticMutation<'_> {
    fn drop(&mut self) {
        if self.state == GuardState::Pending {
            self.restore_snapshots();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_mutation() -> Mutation {
        Mutation::AssessmentWrite {
            product_id: 1,
            system_id: 10,
        }
    }

    #[test]
    fn test_revert_restores_prior_value() {
        let coordinator = CacheCoordinator::new(16);
        coordinator.put(Topic::Matrix(1), "before".to_string());

        let guard = OptimisticMutation::begin(&coordinator, &write_mutation());
        guard.apply(Topic::Matrix(1), "speculative".to_string());
        assert_eq!(
            coordinator.get::<String>(&Topic::Matrix(1)).as_deref(),
            Some(&"speculative".to_string())
        );

        guard.revert();
        assert_eq!(
            coordinator.get::<String>(&Topic::Matrix(1)).as_deref(),
            Some(&"before".to_string())
        );
    }

    #[test]
    fn test_revert_removes_value_that_did_not_exist() {
        let coordinator = CacheCoordinator::new(16);
        let guard = OptimisticMutation::begin(&coordinator, &write_mutation());
        guard.apply(Topic::Matrix(1), "speculative".to_string());
        guard.revert();
        assert!(coordinator.get::<String>(&Topic::Matrix(1)).is_none());
    }

    #[test]
    fn test_commit_marks_dependents_stale() {
        let coordinator = CacheCoordinator::new(16);
        coordinator.put(Topic::GapAnalysis(1), "gaps".to_string());

        let mutation = write_mutation();
        let guard = OptimisticMutation::begin(&coordinator, &mutation);
        guard.apply(Topic::Matrix(1), "speculative".to_string());
        guard.commit(&mutation);

        // Committed writes invalidate every dependent, speculative
        // value included: all are recomputed lazily from the store.
        assert!(coordinator.get::<String>(&Topic::Matrix(1)).is_none());
        assert!(coordinator.get::<String>(&Topic::GapAnalysis(1)).is_none());
    }

    #[test]
    fn test_dropping_pending_guard_reverts() {
        let coordinator = CacheCoordinator::new(16);
        coordinator.put(Topic::Matrix(1), "before".to_string());
        {
            let guard = OptimisticMutation::begin(&coordinator, &write_mutation());
            guard.apply(Topic::Matrix(1), "speculative".to_string());
            // Early return path: guard dropped without commit or revert.
        }
        assert_eq!(
            coordinator.get::<String>(&Topic::Matrix(1)).as_deref(),
            Some(&"before".to_string())
        );
    }
}
