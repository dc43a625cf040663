//! Control catalog — the immutable framework reference data.
//!
//! Controls are organized Function → Category → Subcategory and are
//! consumed, never produced, by the engine.

use serde::{Deserialize, Serialize};

use super::collections::FxHashMap;
use super::status::RiskLevel;

/// A single framework requirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Control {
    pub control_id: i64,
    /// Stable subcategory code, e.g. `PR.AC-1`.
    pub subcategory_code: String,
    pub name: String,
    pub function_code: String,
    pub function_name: String,
    /// Display order of the owning function within the framework.
    pub function_order: u32,
    pub category_code: String,
    pub category_name: String,
    /// Risk assumed for a gap when no assessment-level risk is recorded.
    pub default_risk: RiskLevel,
}

/// Indexed view over the control reference data.
#[derive(Debug, Clone, Default)]
pub struct ControlCatalog {
    by_id: FxHashMap<i64, Control>,
}

impl ControlCatalog {
    pub fn new(controls: Vec<Control>) -> Self {
        let mut by_id = FxHashMap::default();
        for control in controls {
            by_id.insert(control.control_id, control);
        }
        Self { by_id }
    }

    pub fn get(&self, control_id: i64) -> Option<&Control> {
        self.by_id.get(&control_id)
    }

    pub fn contains(&self, control_id: i64) -> bool {
        self.by_id.contains_key(&control_id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Control> {
        self.by_id.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn control(id: i64, code: &str) -> Control {
        Control {
            control_id: id,
            subcategory_code: code.to_string(),
            name: format!("Control {code}"),
            function_code: "PR".to_string(),
            function_name: "Protect".to_string(),
            function_order: 2,
            category_code: "PR.AC".to_string(),
            category_name: "Access Control".to_string(),
            default_risk: RiskLevel::Medium,
        }
    }

    #[test]
    fn test_catalog_lookup_by_id() {
        let catalog = ControlCatalog::new(vec![control(1, "PR.AC-1"), control(2, "PR.AC-2")]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(1).unwrap().subcategory_code, "PR.AC-1");
        assert!(catalog.get(99).is_none());
    }
}
