//! Shared test fixtures: an in-memory provider and tree builders.

use std::sync::{Arc, Mutex};

use posture_core::errors::{StorageError, WriteError};
use posture_core::traits::{AssessmentStore, ComplianceProvider};
use posture_core::types::{
    find_product, Assessment, AssessmentDraft, AssessmentFilter, BaselineEntry,
    CapabilityCentreNode, Control, ControlStatus, FrameworkNode, ProductNode, RiskLevel,
    SystemNode,
};

#[derive(Default)]
struct Inner {
    controls: Vec<Control>,
    baselines: Vec<BaselineEntry>,
    assessments: Vec<Assessment>,
    tree: Vec<CapabilityCentreNode>,
    next_id: i64,
    fail_writes: bool,
    assessment_reads: usize,
}

/// In-memory implementation of both provider traits. Clones share
/// state, so a test can keep a handle after moving one into the engine.
#[derive(Clone)]
pub struct MemoryProvider {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryProvider {
    pub fn new(
        controls: Vec<Control>,
        baselines: Vec<BaselineEntry>,
        tree: Vec<CapabilityCentreNode>,
    ) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                controls,
                baselines,
                assessments: Vec::new(),
                tree,
                next_id: 1,
                fail_writes: false,
                assessment_reads: 0,
            })),
        }
    }

    pub fn seed_assessments(&self, records: Vec<Assessment>) {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id = records.iter().map(|a| a.assessment_id).max().unwrap_or(0) + 1;
        inner.assessments = records;
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.lock().unwrap().fail_writes = fail;
    }

    /// Number of `assessments()` calls the engine has issued.
    pub fn assessment_reads(&self) -> usize {
        self.inner.lock().unwrap().assessment_reads
    }

    pub fn assessment_count(&self) -> usize {
        self.inner.lock().unwrap().assessments.len()
    }

    pub fn status_of(&self, system_id: i64, control_id: i64) -> Option<ControlStatus> {
        self.inner
            .lock()
            .unwrap()
            .assessments
            .iter()
            .find(|a| a.system_id == system_id && a.control_id == control_id)
            .map(|a| a.status)
    }
}

impl ComplianceProvider for MemoryProvider {
    fn controls(&self) -> Result<Vec<Control>, StorageError> {
        Ok(self.inner.lock().unwrap().controls.clone())
    }

    fn baseline_entries(&self, product_id: i64) -> Result<Vec<BaselineEntry>, StorageError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .baselines
            .iter()
            .filter(|e| e.product_id == product_id)
            .cloned()
            .collect())
    }

    fn assessments(&self, filter: &AssessmentFilter) -> Result<Vec<Assessment>, StorageError> {
        let mut inner = self.inner.lock().unwrap();
        inner.assessment_reads += 1;
        let product_systems: Option<Vec<i64>> = filter.product_id.map(|product_id| {
            find_product(&inner.tree, product_id)
                .map(|p| p.system_ids().collect())
                .unwrap_or_default()
        });
        Ok(inner
            .assessments
            .iter()
            .filter(|a| filter.system_id.map_or(true, |id| a.system_id == id))
            .filter(|a| {
                product_systems
                    .as_ref()
                    .map_or(true, |ids| ids.contains(&a.system_id))
            })
            .cloned()
            .collect())
    }

    fn organization_tree(&self) -> Result<Vec<CapabilityCentreNode>, StorageError> {
        Ok(self.inner.lock().unwrap().tree.clone())
    }
}

impl AssessmentStore for MemoryProvider {
    fn create_assessment(&self, draft: &AssessmentDraft) -> Result<Assessment, WriteError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_writes {
            return Err(WriteError::TransientIo {
                message: "injected failure".to_string(),
            });
        }
        if inner
            .assessments
            .iter()
            .any(|a| (a.system_id, a.control_id) == draft.key())
        {
            return Err(StorageError::Sqlite {
                message: "UNIQUE constraint failed: assessments".to_string(),
            }
            .into());
        }
        let assessment = Assessment {
            assessment_id: inner.next_id,
            system_id: draft.system_id,
            control_id: draft.control_id,
            status: draft.status,
            risk_level: draft.risk_level,
            notes: draft.notes.clone(),
            evidence: draft.evidence.clone(),
            remediation_plan: draft.remediation_plan.clone(),
        };
        inner.next_id += 1;
        inner.assessments.push(assessment.clone());
        Ok(assessment)
    }

    fn update_assessment(
        &self,
        assessment_id: i64,
        draft: &AssessmentDraft,
    ) -> Result<Assessment, WriteError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_writes {
            return Err(WriteError::TransientIo {
                message: "injected failure".to_string(),
            });
        }
        let row = inner
            .assessments
            .iter_mut()
            .find(|a| a.assessment_id == assessment_id)
            .ok_or(StorageError::NotFound {
                what: "assessment".to_string(),
            })?;
        row.status = draft.status;
        row.risk_level = draft.risk_level;
        row.notes = draft.notes.clone();
        row.evidence = draft.evidence.clone();
        row.remediation_plan = draft.remediation_plan.clone();
        Ok(row.clone())
    }

    fn delete_assessment(&self, assessment_id: i64) -> Result<(), WriteError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_writes {
            return Err(WriteError::TransientIo {
                message: "injected failure".to_string(),
            });
        }
        let before = inner.assessments.len();
        inner.assessments.retain(|a| a.assessment_id != assessment_id);
        if inner.assessments.len() == before {
            return Err(StorageError::NotFound {
                what: "assessment".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

// ---- Fixture builders ----

pub fn control(id: i64, function: (&str, &str, u32), category: (&str, &str)) -> Control {
    Control {
        control_id: id,
        subcategory_code: format!("{}-{id}", category.0),
        name: format!("Control {}-{id}", category.0),
        function_code: function.0.to_string(),
        function_name: function.1.to_string(),
        function_order: function.2,
        category_code: category.0.to_string(),
        category_name: category.1.to_string(),
        default_risk: RiskLevel::Medium,
    }
}

pub fn entry(product_id: i64, control_id: i64) -> BaselineEntry {
    BaselineEntry {
        product_id,
        control_id,
        applicable: true,
        priority: None,
    }
}

pub fn assessment(id: i64, system_id: i64, control_id: i64, status: ControlStatus) -> Assessment {
    Assessment {
        assessment_id: id,
        system_id,
        control_id,
        status,
        risk_level: None,
        notes: None,
        evidence: None,
        remediation_plan: None,
    }
}

pub fn draft(system_id: i64, control_id: i64, status: ControlStatus) -> AssessmentDraft {
    AssessmentDraft {
        system_id,
        control_id,
        status,
        risk_level: None,
        notes: None,
        evidence: None,
        remediation_plan: None,
    }
}

pub fn system(id: i64, name: &str) -> SystemNode {
    SystemNode {
        system_id: id,
        name: name.to_string(),
    }
}

pub fn product(id: i64, name: &str, systems: Vec<SystemNode>) -> ProductNode {
    ProductNode {
        product_id: id,
        name: name.to_string(),
        systems,
    }
}

pub fn framework(id: i64, name: &str, products: Vec<ProductNode>) -> FrameworkNode {
    FrameworkNode {
        framework_id: id,
        name: name.to_string(),
        products,
    }
}

pub fn centre(id: i64, name: &str, frameworks: Vec<FrameworkNode>) -> CapabilityCentreNode {
    CapabilityCentreNode {
        capability_centre_id: id,
        name: name.to_string(),
        frameworks,
    }
}
