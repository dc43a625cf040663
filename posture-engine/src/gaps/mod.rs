//! Gap analysis — prioritized non-compliant controls per product.

pub mod analyzer;
pub mod types;

pub use analyzer::analyze;
pub use types::{GapAnalysis, GapEntry};
