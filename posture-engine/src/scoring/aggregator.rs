//! Score accumulator — the single weighting rule for every granularity.

use posture_core::types::ControlStatus;

use super::weights;

/// Exact accumulator over (control, status) observations.
///
/// `merge` is associative and commutative, so a product score can be
/// built either from one pass over all records or by merging per-system
/// (or per-category) accumulators — the results are identical.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreAccumulator {
    /// Applicable baseline slots observed.
    pub applicable: u64,
    /// Slots assessed as Not Applicable (excluded from both sides).
    pub not_applicable: u64,
    /// Slots with a weighted verdict (Implemented/Partially/Not Implemented).
    pub assessed: u64,
    /// Weighted numerator in half-points.
    pub weight_half: u64,
}

impl ScoreAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe one applicable (control, status) slot.
    pub fn observe(&mut self, status: ControlStatus) {
        self.applicable += 1;
        match weights::half_points(status) {
            Some(points) => {
                self.assessed += 1;
                self.weight_half += points;
            }
            None if status == ControlStatus::NotApplicable => {
                self.not_applicable += 1;
            }
            None => {} // NotAssessed: counted by coverage only
        }
    }

    /// Fold another accumulator into this one.
    pub fn merge(&mut self, other: &Self) {
        self.applicable += other.applicable;
        self.not_applicable += other.not_applicable;
        self.assessed += other.assessed;
        self.weight_half += other.weight_half;
    }

    /// Compliance denominator: applicable minus Not Applicable.
    pub fn denominator(&self) -> u64 {
        self.applicable - self.not_applicable
    }

    /// Weighted compliance percentage, rounded half-up.
    ///
    /// A zero denominator yields 0; callers distinguish that from a
    /// true zero (fully assessed, nothing implemented) via `assessed`.
    pub fn compliance_percent(&self) -> u32 {
        let d = self.denominator();
        if d == 0 {
            return 0;
        }
        // round(100 * weight_half / (2 * d)) in integers
        ((100 * self.weight_half + d) / (2 * d)) as u32
    }

    /// Percentage of applicable slots that have been assessed.
    pub fn coverage_percent(&self) -> u32 {
        if self.applicable == 0 {
            return 0;
        }
        ((200 * self.assessed + self.applicable) / (2 * self.applicable)) as u32
    }

    pub fn is_empty(&self) -> bool {
        self.applicable == 0
    }
}
