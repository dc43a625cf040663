//! Derived rollup view structures.
//!
//! The organizational tree itself stays immutable; a rollup produces
//! this separate annotated view.

use serde::Serialize;

/// A system flagged for attention (score below the critical threshold).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttentionEntry {
    pub system_id: i64,
    pub name: String,
    pub score: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SystemRollup {
    pub system_id: i64,
    pub name: String,
    pub score: u32,
    pub assessed_controls: u64,
    pub applicable_controls: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductRollup {
    pub product_id: i64,
    pub name: String,
    pub score: u32,
    pub assessed_controls: u64,
    pub applicable_controls: u64,
    pub total_systems: usize,
    /// Systems with zero assessed controls.
    pub unassessed_systems: usize,
    /// Worst-first, capped to the configured attention cap.
    pub attention: Vec<AttentionEntry>,
    /// True if the product has a configured baseline.
    pub has_baseline: bool,
    pub systems: Vec<SystemRollup>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FrameworkRollup {
    pub framework_id: i64,
    pub name: String,
    pub score: u32,
    pub assessed_controls: u64,
    pub applicable_controls: u64,
    pub total_systems: usize,
    pub unassessed_systems: usize,
    pub attention: Vec<AttentionEntry>,
    pub products: Vec<ProductRollup>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CapabilityCentreRollup {
    pub capability_centre_id: i64,
    pub name: String,
    pub score: u32,
    pub assessed_controls: u64,
    pub applicable_controls: u64,
    pub total_systems: usize,
    pub unassessed_systems: usize,
    pub attention: Vec<AttentionEntry>,
    pub frameworks: Vec<FrameworkRollup>,
}

/// One row of the cross-branch framework summary.
///
/// Frameworks are merged by case-insensitive name; this is a display
/// aggregation only — the underlying framework rows stay distinct, and
/// the contributing capability centre names are retained so a collision
/// is visible rather than silent.
#[derive(Debug, Clone, Serialize)]
pub struct FrameworkSummary {
    pub name: String,
    pub cc_names: Vec<String>,
    pub product_count: usize,
    pub system_count: usize,
    /// Unweighted mean of the contributing frameworks' scores.
    pub score: u32,
}

/// The fully annotated organizational hierarchy.
#[derive(Debug, Clone, Serialize)]
pub struct HierarchyView {
    /// Rollup generation; a view from a superseded generation is
    /// discarded, never merged.
    pub generation: u64,
    pub centres: Vec<CapabilityCentreRollup>,
    pub framework_summaries: Vec<FrameworkSummary>,
    pub total_systems: usize,
}
