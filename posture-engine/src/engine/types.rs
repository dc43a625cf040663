//! Facade output views.
//!
//! Every view here is derived on demand from baseline and assessment
//! records and cached under a [`crate::cache::Topic`]; none of these
//! numbers are ever persisted.

use serde::Serialize;

use crate::scoring::{RiskBreakdown, StatusBreakdown};

/// Weighted compliance for one system against its product's baseline.
#[derive(Debug, Clone, Serialize)]
pub struct SystemScore {
    pub system_id: i64,
    pub name: String,
    pub score: u32,
    /// Percentage of applicable controls with any verdict.
    pub coverage: u32,
    pub assessed_controls: u64,
    pub applicable_controls: u64,
    pub status_breakdown: StatusBreakdown,
}

/// Product-level compliance: the union of its systems' slots.
#[derive(Debug, Clone, Serialize)]
pub struct ProductCompliance {
    pub product_id: i64,
    pub name: String,
    pub compliance_score: u32,
    pub coverage: u32,
    pub assessed_controls: u64,
    pub applicable_controls: u64,
    pub status_breakdown: StatusBreakdown,
    /// Effective risk of every gap slot in the product.
    pub risk_breakdown: RiskBreakdown,
    pub system_scores: Vec<SystemScore>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryCompliance {
    pub category_code: String,
    pub category_name: String,
    pub score: u32,
    pub assessed_controls: u64,
    pub applicable_controls: u64,
}

/// Per-function score with its category drill-down.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionCompliance {
    pub function_code: String,
    pub function_name: String,
    pub function_order: u32,
    pub score: u32,
    pub assessed_controls: u64,
    pub applicable_controls: u64,
    pub categories: Vec<CategoryCompliance>,
}

/// Function-level breakdown, product-wide or scoped to one system.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionComplianceView {
    pub product_id: i64,
    /// `None` means the product-wide view over all its systems.
    pub system_id: Option<i64>,
    /// Functions in framework display order.
    pub functions: Vec<FunctionCompliance>,
}

/// Organization-wide risk posture across every product's open gaps.
#[derive(Debug, Clone, Serialize)]
pub struct RiskSummary {
    pub total_gaps: usize,
    pub critical_gaps: usize,
    pub high_risk_gaps: usize,
    pub breakdown: RiskBreakdown,
    /// Products skipped because no baseline is configured.
    pub products_without_baseline: usize,
}
