//! Hierarchy rollup — bottom-up aggregation through the four-level tree.

pub mod builder;
pub mod framework_merge;
pub mod types;

pub use builder::{RollupBuilder, RollupInputs};
pub use framework_merge::merge_frameworks_by_name;
pub use types::{
    AttentionEntry, CapabilityCentreRollup, FrameworkRollup, FrameworkSummary, HierarchyView,
    ProductRollup, SystemRollup,
};
