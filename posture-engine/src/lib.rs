//! Compliance aggregation and gap-analysis engine.
//!
//! Turns raw per-system, per-control assessment records into weighted
//! scores, a four-level hierarchical rollup, prioritized gap lists, and
//! matrix views, with explicit cache invalidation around every
//! mutation. Scores are derived, never stored: each view is recomputed
//! from baseline and assessment records on demand.

pub mod autosave;
pub mod baseline;
pub mod cache;
pub mod engine;
pub mod gaps;
pub mod lookup;
pub mod matrix;
pub mod rollup;
pub mod scoring;

pub use engine::ComplianceEngine;
