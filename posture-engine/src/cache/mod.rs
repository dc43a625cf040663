//! Cache/invalidation coordination.
//!
//! An explicit topic-based invalidation table replaces implicit
//! observer wiring: every mutation maps to a fixed set of cached-view
//! topics, and no cached aggregate is served without a staleness check
//! against the most recent mutation stamp for its scope.

pub mod coordinator;
pub mod optimistic;
pub mod topic;

pub use coordinator::{CacheCoordinator, CachedEntry};
pub use optimistic::OptimisticMutation;
pub use topic::{Mutation, Topic};
