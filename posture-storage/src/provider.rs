//! SqliteProvider — the engine's data collaborator over SQLite.
//!
//! Reads go through the pooled read connections, writes through the
//! serialized writer. Admin operations (loading the control dataset,
//! shaping the organization tree, replacing a baseline) live here too;
//! the engine itself never issues SQL.

use std::path::Path;

use posture_core::errors::{StorageError, WriteError};
use posture_core::traits::{AssessmentStore, ComplianceProvider};
use posture_core::types::{
    Assessment, AssessmentDraft, AssessmentFilter, BaselineEntry, CapabilityCentreNode, Control,
};

use crate::connection::writer::with_immediate_transaction;
use crate::connection::DatabaseManager;
use crate::queries::{assessments, baseline, controls, organization};

pub struct SqliteProvider {
    db: DatabaseManager,
}

impl SqliteProvider {
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        Ok(Self {
            db: DatabaseManager::open(path)?,
        })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(Self {
            db: DatabaseManager::open_in_memory()?,
        })
    }

    pub fn database(&self) -> &DatabaseManager {
        &self.db
    }

    // ---- Admin: reference data and organization shape ----

    /// Load (or reload) the control reference dataset.
    pub fn load_controls(&self, dataset: &[Control]) -> Result<(), StorageError> {
        self.db.with_writer(|conn| {
            with_immediate_transaction(conn, |tx| {
                for control in dataset {
                    controls::insert_control(tx, control)?;
                }
                Ok(())
            })
        })
    }

    pub fn add_capability_centre(&self, name: &str) -> Result<i64, StorageError> {
        self.db
            .with_writer(|conn| organization::insert_capability_centre(conn, name))
    }

    pub fn add_framework(&self, centre_id: i64, name: &str) -> Result<i64, StorageError> {
        self.db
            .with_writer(|conn| organization::insert_framework(conn, centre_id, name))
    }

    pub fn add_product(&self, framework_id: i64, name: &str) -> Result<i64, StorageError> {
        self.db
            .with_writer(|conn| organization::insert_product(conn, framework_id, name))
    }

    pub fn add_system(&self, product_id: i64, name: &str) -> Result<i64, StorageError> {
        self.db
            .with_writer(|conn| organization::insert_system(conn, product_id, name))
    }

    /// Delete a system and, via cascade, its assessments.
    pub fn remove_system(&self, system_id: i64) -> Result<bool, StorageError> {
        self.db
            .with_writer(|conn| organization::delete_system(conn, system_id))
    }

    /// Replace a product's baseline atomically.
    pub fn replace_baseline(
        &self,
        product_id: i64,
        entries: &[BaselineEntry],
    ) -> Result<(), StorageError> {
        self.db.with_writer(|conn| {
            with_immediate_transaction(conn, |tx| {
                baseline::delete_for_product(tx, product_id)?;
                for entry in entries {
                    baseline::upsert_entry(tx, entry)?;
                }
                Ok(())
            })
        })
    }
}

impl ComplianceProvider for SqliteProvider {
    fn controls(&self) -> Result<Vec<Control>, StorageError> {
        self.db.with_reader(controls::query_all)
    }

    fn baseline_entries(&self, product_id: i64) -> Result<Vec<BaselineEntry>, StorageError> {
        self.db
            .with_reader(|conn| baseline::query_for_product(conn, product_id))
    }

    fn assessments(&self, filter: &AssessmentFilter) -> Result<Vec<Assessment>, StorageError> {
        self.db.with_reader(|conn| assessments::query(conn, filter))
    }

    fn organization_tree(&self) -> Result<Vec<CapabilityCentreNode>, StorageError> {
        self.db.with_reader(organization::query_tree)
    }
}

impl AssessmentStore for SqliteProvider {
    fn create_assessment(&self, draft: &AssessmentDraft) -> Result<Assessment, WriteError> {
        Ok(self
            .db
            .with_writer(|conn| assessments::insert(conn, draft))?)
    }

    fn update_assessment(
        &self,
        assessment_id: i64,
        draft: &AssessmentDraft,
    ) -> Result<Assessment, WriteError> {
        Ok(self
            .db
            .with_writer(|conn| assessments::update(conn, assessment_id, draft))?)
    }

    fn delete_assessment(&self, assessment_id: i64) -> Result<(), WriteError> {
        let deleted = self
            .db
            .with_writer(|conn| assessments::delete(conn, assessment_id))?;
        if !deleted {
            return Err(StorageError::NotFound {
                what: format!("assessment {assessment_id}"),
            }
            .into());
        }
        Ok(())
    }
}
