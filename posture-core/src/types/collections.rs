//! FxHash collections used on aggregation hot paths.

pub use rustc_hash::{FxHashMap, FxHashSet};
