//! Status weights in half-points.
//!
//! Implemented = 1.0 and Partially Implemented = 0.5, stored as 2 and 1
//! half-points so sums stay in integer arithmetic.

use posture_core::types::ControlStatus;

pub const IMPLEMENTED_HALF_POINTS: u64 = 2;
pub const PARTIAL_HALF_POINTS: u64 = 1;

/// Half-point weight contributed to the numerator, or `None` when the
/// status is excluded from the weighted sum entirely.
pub fn half_points(status: ControlStatus) -> Option<u64> {
    match status {
        ControlStatus::Implemented => Some(IMPLEMENTED_HALF_POINTS),
        ControlStatus::PartiallyImplemented => Some(PARTIAL_HALF_POINTS),
        ControlStatus::NotImplemented => Some(0),
        ControlStatus::NotApplicable | ControlStatus::NotAssessed => None,
    }
}
