//! Data collaborator traits.
//!
//! Persistence and CRUD plumbing are external collaborators; the engine
//! reaches them only through these seams. `posture-storage` ships the
//! SQLite implementation, tests supply in-memory ones.

use crate::errors::{StorageError, WriteError};
use crate::types::{
    Assessment, AssessmentDraft, AssessmentFilter, BaselineEntry, CapabilityCentreNode, Control,
};

/// Read side: reference data, baselines, assessments, and the
/// organizational tree.
pub trait ComplianceProvider {
    /// The immutable control reference dataset.
    fn controls(&self) -> Result<Vec<Control>, StorageError>;

    /// All baseline entries for a product, applicable or not.
    /// An empty result means no baseline has ever been configured.
    fn baseline_entries(&self, product_id: i64) -> Result<Vec<BaselineEntry>, StorageError>;

    /// Assessment rows matching the filter.
    fn assessments(&self, filter: &AssessmentFilter) -> Result<Vec<Assessment>, StorageError>;

    /// The full capability centre → framework → product → system tree.
    fn organization_tree(&self) -> Result<Vec<CapabilityCentreNode>, StorageError>;
}

/// Write side: assessment mutations.
///
/// The create-vs-update decision belongs to the engine; stores must
/// reject a create that would violate the (system, control) uniqueness
/// invariant rather than silently duplicating.
pub trait AssessmentStore {
    fn create_assessment(&self, draft: &AssessmentDraft) -> Result<Assessment, WriteError>;

    fn update_assessment(
        &self,
        assessment_id: i64,
        draft: &AssessmentDraft,
    ) -> Result<Assessment, WriteError>;

    fn delete_assessment(&self, assessment_id: i64) -> Result<(), WriteError>;
}
