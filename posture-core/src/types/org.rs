//! The four-level organizational containment tree.
//!
//! Capability centre → framework → product → system, outermost to
//! innermost. The tree is an immutable input; rollups produce separate
//! derived view structures and never mutate these nodes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemNode {
    pub system_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductNode {
    pub product_id: i64,
    pub name: String,
    pub systems: Vec<SystemNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameworkNode {
    pub framework_id: i64,
    pub name: String,
    pub products: Vec<ProductNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityCentreNode {
    pub capability_centre_id: i64,
    pub name: String,
    pub frameworks: Vec<FrameworkNode>,
}

impl ProductNode {
    pub fn system_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.systems.iter().map(|s| s.system_id)
    }
}

/// Walk every product in a forest of capability centres.
pub fn products(tree: &[CapabilityCentreNode]) -> impl Iterator<Item = &ProductNode> {
    tree.iter()
        .flat_map(|cc| cc.frameworks.iter())
        .flat_map(|fw| fw.products.iter())
}

/// Find a product node by id anywhere in the tree.
pub fn find_product(tree: &[CapabilityCentreNode], product_id: i64) -> Option<&ProductNode> {
    products(tree).find(|p| p.product_id == product_id)
}

/// Find the product that owns a system, with the system node itself.
pub fn find_system(
    tree: &[CapabilityCentreNode],
    system_id: i64,
) -> Option<(&ProductNode, &SystemNode)> {
    products(tree).find_map(|p| {
        p.systems
            .iter()
            .find(|s| s.system_id == system_id)
            .map(|s| (p, s))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> Vec<CapabilityCentreNode> {
        vec![CapabilityCentreNode {
            capability_centre_id: 1,
            name: "Digital".to_string(),
            frameworks: vec![FrameworkNode {
                framework_id: 10,
                name: "Security".to_string(),
                products: vec![ProductNode {
                    product_id: 100,
                    name: "Payments".to_string(),
                    systems: vec![
                        SystemNode {
                            system_id: 1000,
                            name: "Gateway".to_string(),
                        },
                        SystemNode {
                            system_id: 1001,
                            name: "Ledger".to_string(),
                        },
                    ],
                }],
            }],
        }]
    }

    #[test]
    fn test_find_system_returns_owning_product() {
        let tree = tree();
        let (product, system) = find_system(&tree, 1001).unwrap();
        assert_eq!(product.product_id, 100);
        assert_eq!(system.name, "Ledger");
        assert!(find_system(&tree, 9999).is_none());
    }

    #[test]
    fn test_find_product() {
        let tree = tree();
        assert_eq!(find_product(&tree, 100).unwrap().name, "Payments");
        assert!(find_product(&tree, 123).is_none());
    }
}
