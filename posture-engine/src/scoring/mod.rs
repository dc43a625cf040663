//! Weighted compliance scoring.
//!
//! All aggregation happens in exact half-point integers so a category
//! rollup and a system rollup of the same records agree bit-for-bit;
//! rounding to a display percentage happens exactly once, at the edge.

pub mod aggregator;
pub mod breakdown;
pub mod weights;

pub use aggregator::ScoreAccumulator;
pub use breakdown::{RiskBreakdown, StatusBreakdown};
