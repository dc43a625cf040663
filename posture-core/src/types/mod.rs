//! Domain types shared across the workspace.

pub mod assessment;
pub mod catalog;
pub mod collections;
pub mod org;
pub mod status;

pub use assessment::{Assessment, AssessmentDraft, AssessmentFilter, BaselineEntry};
pub use catalog::{Control, ControlCatalog};
pub use org::{
    find_product, find_system, products, CapabilityCentreNode, FrameworkNode, ProductNode,
    SystemNode,
};
pub use status::{ControlStatus, RiskLevel};
