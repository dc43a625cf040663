//! Cache coordinator — staleness-checked view cache.
//!
//! A logical mutation clock stamps both mutations (per topic) and
//! cached values. A cached view is served only when its stamp is at
//! least as new as the last mutation touching its topic, so a view can
//! never outlive the data it was derived from.

use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use moka::sync::Cache;

use posture_core::types::collections::FxHashMap;

use super::topic::{Mutation, Topic};

/// A type-erased cached view with the clock stamp it was computed at.
#[derive(Clone)]
pub struct CachedEntry {
    pub stamp: u64,
    value: Arc<dyn Any + Send + Sync>,
}

pub struct CacheCoordinator {
    store: Cache<Topic, CachedEntry>,
    /// Last mutation stamp per topic.
    stamps: Mutex<FxHashMap<Topic, u64>>,
    /// Logical clock; bumped once per recorded mutation.
    clock: AtomicU64,
    /// Bumped whenever a mutation invalidates the hierarchy topic.
    hierarchy_generation: AtomicU64,
}

impl CacheCoordinator {
    pub fn new(capacity: u64) -> Self {
        Self {
            store: Cache::builder().max_capacity(capacity).build(),
            stamps: Mutex::new(FxHashMap::default()),
            clock: AtomicU64::new(0),
            hierarchy_generation: AtomicU64::new(0),
        }
    }

    fn stamps(&self) -> MutexGuard<'_, FxHashMap<Topic, u64>> {
        self.stamps.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current logical clock value. Capture before reading source
    /// records so the computed view is stamped at read time.
    pub fn read_stamp(&self) -> u64 {
        self.clock.load(Ordering::Acquire)
    }

    /// Current hierarchy rollup generation.
    pub fn generation(&self) -> u64 {
        self.hierarchy_generation.load(Ordering::Acquire)
    }

    /// Record a mutation: bump the clock, stamp and drop every topic in
    /// the invalidation table. Returns the mutation stamp.
    pub fn record_mutation(&self, mutation: &Mutation) -> u64 {
        let stamp = self.clock.fetch_add(1, Ordering::AcqRel) + 1;
        let topics = mutation.invalidates();
        tracing::debug!(
            mutation = mutation.describe(),
            topics = topics.len(),
            stamp,
            "invalidating cached views"
        );
        let mut stamps = self.stamps();
        for topic in &topics {
            stamps.insert(topic.clone(), stamp);
            self.store.invalidate(topic);
        }
        if topics.contains(&Topic::Hierarchy) {
            self.hierarchy_generation.fetch_add(1, Ordering::AcqRel);
        }
        stamp
    }

    /// Fetch a cached view if present and not stale.
    pub fn get<T: Send + Sync + 'static>(&self, topic: &Topic) -> Option<Arc<T>> {
        let entry = self.store.get(topic)?;
        let last_mutation = self.stamps().get(topic).copied().unwrap_or(0);
        if entry.stamp < last_mutation {
            return None;
        }
        entry.value.downcast::<T>().ok()
    }

    /// Cache a view computed from records read at `read_stamp`.
    pub fn put_at<T: Send + Sync + 'static>(
        &self,
        topic: Topic,
        value: T,
        read_stamp: u64,
    ) -> Arc<T> {
        let value = Arc::new(value);
        self.store.insert(
            topic,
            CachedEntry {
                stamp: read_stamp,
                value: value.clone(),
            },
        );
        value
    }

    /// Cache a view stamped at the current clock.
    pub fn put<T: Send + Sync + 'static>(&self, topic: Topic, value: T) -> Arc<T> {
        self.put_at(topic, value, self.read_stamp())
    }

    /// Snapshot the raw entry for a topic (optimistic-write support).
    pub(crate) fn snapshot(&self, topic: &Topic) -> Option<CachedEntry> {
        self.store.get(topic)
    }

    /// Restore a previously taken snapshot.
    pub(crate) fn restore(&self, topic: Topic, snapshot: Option<CachedEntry>) {
        match snapshot {
            Some(entry) => self.store.insert(topic, entry),
            None => self.store.invalidate(&topic),
        }
    }

    /// Speculatively replace a topic's entry, keeping its read stamp
    /// current so the patched view stays servable until commit/revert.
    pub(crate) fn apply_speculative<T: Send + Sync + 'static>(&self, topic: Topic, value: T) {
        self.put(topic, value);
    }
}
