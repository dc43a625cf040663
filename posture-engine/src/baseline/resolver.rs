//! Baseline resolver.
//!
//! Zero entries means no baseline was ever configured — a distinct
//! signal from a baseline that deliberately excludes every control.

use posture_core::errors::{EngineError, EntityKind};
use posture_core::types::collections::FxHashSet;
use posture_core::types::{BaselineEntry, Control, ControlCatalog};

/// The resolved, ordered set of applicable controls for one product.
#[derive(Debug, Clone)]
pub struct ResolvedBaseline {
    pub product_id: i64,
    /// Applicable controls in (function_order, category, subcategory)
    /// order. Matrix rows and gap tie-breaks rely on this ordering.
    pub controls: Vec<Control>,
    control_ids: FxHashSet<i64>,
}

impl ResolvedBaseline {
    pub fn applicable_count(&self) -> usize {
        self.controls.len()
    }

    pub fn contains(&self, control_id: i64) -> bool {
        self.control_ids.contains(&control_id)
    }
}

/// Resolve a product's baseline against the control catalog.
///
/// Returns `NoBaselineConfigured` when the product has zero entries at
/// all, and `UnknownEntity` when an entry references a control missing
/// from the catalog.
pub fn resolve(
    product_id: i64,
    entries: &[BaselineEntry],
    catalog: &ControlCatalog,
) -> Result<ResolvedBaseline, EngineError> {
    if entries.is_empty() {
        return Err(EngineError::NoBaselineConfigured { product_id });
    }

    let mut controls = Vec::new();
    let mut control_ids = FxHashSet::default();
    for entry in entries {
        if !entry.applicable {
            continue;
        }
        let control = catalog
            .get(entry.control_id)
            .ok_or(EngineError::UnknownEntity {
                kind: EntityKind::Control,
                id: entry.control_id,
            })?;
        if control_ids.insert(entry.control_id) {
            controls.push(control.clone());
        }
    }

    controls.sort_by(|a, b| {
        a.function_order
            .cmp(&b.function_order)
            .then_with(|| a.category_code.cmp(&b.category_code))
            .then_with(|| a.subcategory_code.cmp(&b.subcategory_code))
    });

    Ok(ResolvedBaseline {
        product_id,
        controls,
        control_ids,
    })
}
