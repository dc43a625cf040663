//! ComplianceEngine — the operation facade.
//!
//! Every read runs cache-first against the coordinator and recomputes
//! from provider records on a miss; every write runs inside an
//! optimistic mutation guard. The provider is a trait object seam, so
//! the same engine drives the SQLite store and in-memory test fakes.

pub mod types;

use std::sync::Arc;

use posture_core::config::EngineConfig;
use posture_core::errors::{EngineError, EntityKind};
use posture_core::events::{
    AssessmentDeletedEvent, AssessmentSavedEvent, BaselineChangedEvent, EventDispatcher,
    PostureEventHandler, RollupCompletedEvent, RollupSupersededEvent, SystemChangedEvent,
    ViewsInvalidatedEvent, WriteFailedEvent,
};
use posture_core::traits::{
    AssessmentStore, Cancellable, Clock, ComplianceProvider, SystemClock,
};
use posture_core::types::collections::FxHashMap;
use posture_core::types::{
    find_product, find_system, products, Assessment, AssessmentDraft, AssessmentFilter,
    CapabilityCentreNode, ControlCatalog, ProductNode, SystemNode,
};

use crate::autosave::AutosaveQueue;
use crate::baseline::{self, ResolvedBaseline};
use crate::cache::{CacheCoordinator, Mutation, OptimisticMutation, Topic};
use crate::gaps::{self, GapAnalysis};
use crate::lookup::AssessmentIndex;
use crate::matrix::{self, AssessmentMatrix};
use crate::rollup::{HierarchyView, RollupBuilder, RollupInputs};
use crate::scoring::{RiskBreakdown, ScoreAccumulator, StatusBreakdown};

pub use types::{
    CategoryCompliance, FunctionCompliance, FunctionComplianceView, ProductCompliance,
    RiskSummary, SystemScore,
};

/// A rollup is retried at most this many times when a concurrent
/// mutation supersedes its generation mid-flight.
const MAX_ROLLUP_ATTEMPTS: usize = 3;

pub struct ComplianceEngine<P> {
    provider: P,
    config: EngineConfig,
    cache: CacheCoordinator,
    events: EventDispatcher,
    autosave: AutosaveQueue,
}

impl<P: ComplianceProvider + AssessmentStore> ComplianceEngine<P> {
    pub fn new(provider: P, config: EngineConfig) -> Self {
        Self::with_clock(provider, config, Arc::new(SystemClock))
    }

    /// Construct with an explicit clock. Tests inject a manual clock to
    /// drive the autosave quiet period deterministically.
    pub fn with_clock(provider: P, config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        let cache = CacheCoordinator::new(config.effective_cache_capacity());
        let autosave = AutosaveQueue::new(clock, config.effective_autosave_quiet_ms());
        Self {
            provider,
            config,
            cache,
            events: EventDispatcher::new(),
            autosave,
        }
    }

    pub fn register_handler(&mut self, handler: Arc<dyn PostureEventHandler>) {
        self.events.register(handler);
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current hierarchy rollup generation.
    pub fn generation(&self) -> u64 {
        self.cache.generation()
    }

    // ---- Scoring reads ----

    /// Weighted compliance for one system.
    pub fn system_score(&self, system_id: i64) -> Result<Arc<SystemScore>, EngineError> {
        let topic = Topic::SystemScore(system_id);
        if let Some(cached) = self.cache.get::<SystemScore>(&topic) {
            return Ok(cached);
        }
        let stamp = self.cache.read_stamp();
        let tree = self.load_tree()?;
        let (product, system) =
            find_system(&tree, system_id).ok_or(EngineError::UnknownEntity {
                kind: EntityKind::System,
                id: system_id,
            })?;
        let baseline = self.baseline(product.product_id)?;
        let index = self.index_for(&AssessmentFilter::for_system(system_id))?;
        let score = score_system(system, &baseline, &index);
        Ok(self.cache.put_at(topic, score, stamp))
    }

    /// Product compliance: union of its systems' slots, with status and
    /// risk distributions and per-system scores.
    pub fn product_compliance(
        &self,
        product_id: i64,
    ) -> Result<Arc<ProductCompliance>, EngineError> {
        let topic = Topic::ProductCompliance(product_id);
        if let Some(cached) = self.cache.get::<ProductCompliance>(&topic) {
            return Ok(cached);
        }
        tracing::debug!(product_id, "computing product compliance");
        let stamp = self.cache.read_stamp();
        let tree = self.load_tree()?;
        let product = self.find_product(&tree, product_id)?;
        let baseline = self.baseline(product_id)?;
        let index = self.index_for(&AssessmentFilter::for_product(product_id))?;

        let mut acc = ScoreAccumulator::new();
        let mut status_breakdown = StatusBreakdown::default();
        let mut risk_breakdown = RiskBreakdown::default();
        let mut system_scores = Vec::with_capacity(product.systems.len());

        for system in &product.systems {
            let score = score_system(system, &baseline, &index);
            for control in &baseline.controls {
                let status = index.status(system.system_id, control.control_id);
                acc.observe(status);
                status_breakdown.observe(status);
                if status.is_gap() {
                    let risk = index
                        .get(system.system_id, control.control_id)
                        .and_then(|a| a.risk_level)
                        .unwrap_or(control.default_risk);
                    risk_breakdown.observe(risk);
                }
            }
            system_scores.push(score);
        }

        let view = ProductCompliance {
            product_id,
            name: product.name.clone(),
            compliance_score: acc.compliance_percent(),
            coverage: acc.coverage_percent(),
            assessed_controls: acc.assessed,
            applicable_controls: acc.applicable,
            status_breakdown,
            risk_breakdown,
            system_scores,
        };
        Ok(self.cache.put_at(topic, view, stamp))
    }

    /// Function → category breakdown, product-wide or scoped to one
    /// system. Only the product-wide variant is cached.
    pub fn function_compliance(
        &self,
        product_id: i64,
        system_id: Option<i64>,
    ) -> Result<Arc<FunctionComplianceView>, EngineError> {
        let topic = Topic::FunctionCompliance(product_id);
        if system_id.is_none() {
            if let Some(cached) = self.cache.get::<FunctionComplianceView>(&topic) {
                return Ok(cached);
            }
        }
        let stamp = self.cache.read_stamp();
        let tree = self.load_tree()?;
        let product = self.find_product(&tree, product_id)?;
        let baseline = self.baseline(product_id)?;
        let index = self.index_for(&AssessmentFilter::for_product(product_id))?;

        let systems: Vec<&SystemNode> = match system_id {
            Some(id) => {
                let system = product
                    .systems
                    .iter()
                    .find(|s| s.system_id == id)
                    .ok_or(EngineError::UnknownEntity {
                        kind: EntityKind::System,
                        id,
                    })?;
                vec![system]
            }
            None => product.systems.iter().collect(),
        };

        let view = FunctionComplianceView {
            product_id,
            system_id,
            functions: function_breakdown(&baseline, &systems, &index),
        };
        match system_id {
            None => Ok(self.cache.put_at(topic, view, stamp)),
            Some(_) => Ok(Arc::new(view)),
        }
    }

    // ---- Matrix and gaps ----

    /// The controls × systems matrix for one product.
    pub fn assessment_matrix(
        &self,
        product_id: i64,
    ) -> Result<Arc<AssessmentMatrix>, EngineError> {
        let topic = Topic::Matrix(product_id);
        if let Some(cached) = self.cache.get::<AssessmentMatrix>(&topic) {
            return Ok(cached);
        }
        tracing::debug!(product_id, "building assessment matrix");
        let stamp = self.cache.read_stamp();
        let tree = self.load_tree()?;
        let product = self.find_product(&tree, product_id)?;
        let baseline = self.baseline(product_id)?;
        let index = self.index_for(&AssessmentFilter::for_product(product_id))?;
        let matrix = matrix::build(&baseline, &product.systems, &index);
        Ok(self.cache.put_at(topic, matrix, stamp))
    }

    /// Prioritized gap list for one product.
    pub fn gap_analysis(&self, product_id: i64) -> Result<Arc<GapAnalysis>, EngineError> {
        let topic = Topic::GapAnalysis(product_id);
        if let Some(cached) = self.cache.get::<GapAnalysis>(&topic) {
            return Ok(cached);
        }
        tracing::debug!(product_id, "analyzing gaps");
        let stamp = self.cache.read_stamp();
        let tree = self.load_tree()?;
        let product = self.find_product(&tree, product_id)?;
        let baseline = self.baseline(product_id)?;
        let index = self.index_for(&AssessmentFilter::for_product(product_id))?;
        let analysis = gaps::analyze(
            &baseline,
            &product.systems,
            &index,
            self.config.effective_gap_cap(),
        );
        Ok(self.cache.put_at(topic, analysis, stamp))
    }

    /// Organization-wide risk posture over every product's open gaps.
    pub fn risk_summary(&self) -> Result<Arc<RiskSummary>, EngineError> {
        if let Some(cached) = self.cache.get::<RiskSummary>(&Topic::RiskSummary) {
            return Ok(cached);
        }
        tracing::debug!("computing risk summary");
        let stamp = self.cache.read_stamp();
        let tree = self.load_tree()?;
        let catalog = self.catalog()?;
        let index = self.index_for(&AssessmentFilter::default())?;

        let mut summary = RiskSummary {
            total_gaps: 0,
            critical_gaps: 0,
            high_risk_gaps: 0,
            breakdown: RiskBreakdown::default(),
            products_without_baseline: 0,
        };
        for product in products(&tree) {
            let baseline = match self.baseline_with(product.product_id, &catalog) {
                Ok(b) => b,
                Err(EngineError::NoBaselineConfigured { .. }) => {
                    summary.products_without_baseline += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };
            // Uncapped so every grouped gap contributes to the totals.
            let analysis = gaps::analyze(&baseline, &product.systems, &index, usize::MAX);
            summary.total_gaps += analysis.total_gaps;
            summary.critical_gaps += analysis.critical_gaps;
            summary.high_risk_gaps += analysis.high_risk_gaps;
            for gap in &analysis.gaps {
                summary.breakdown.observe(gap.risk_level);
            }
        }
        Ok(self.cache.put_at(Topic::RiskSummary, summary, stamp))
    }

    // ---- Hierarchy rollup ----

    /// Full annotated hierarchy. A result computed against a superseded
    /// generation is discarded and the rollup retried, bounded by
    /// [`MAX_ROLLUP_ATTEMPTS`].
    pub fn hierarchy_with_scores(
        &self,
        cancel: &dyn Cancellable,
    ) -> Result<Arc<HierarchyView>, EngineError> {
        for attempt in 0..MAX_ROLLUP_ATTEMPTS {
            if let Some(cached) = self.cache.get::<HierarchyView>(&Topic::Hierarchy) {
                return Ok(cached);
            }
            let generation = self.cache.generation();
            let stamp = self.cache.read_stamp();
            tracing::debug!(generation, attempt, "starting hierarchy rollup");

            let tree = self.load_tree()?;
            let catalog = self.catalog()?;
            let index = self.index_for(&AssessmentFilter::default())?;
            let mut baselines: FxHashMap<i64, ResolvedBaseline> = FxHashMap::default();
            for product in products(&tree) {
                match self.baseline_with(product.product_id, &catalog) {
                    Ok(b) => {
                        baselines.insert(product.product_id, (*b).clone());
                    }
                    // No baseline: the product rolls up as unassessed.
                    Err(EngineError::NoBaselineConfigured { .. }) => {}
                    Err(e) => return Err(e),
                }
            }

            let builder = RollupBuilder::new(&self.config);
            let inputs = RollupInputs {
                tree: &tree,
                baselines: &baselines,
                index: &index,
            };
            let view = builder.build(&inputs, cancel, generation)?;

            let current = self.cache.generation();
            if current != generation {
                self.events.emit_rollup_superseded(&RollupSupersededEvent {
                    stale_generation: generation,
                    current_generation: current,
                });
                tracing::debug!(
                    stale = generation,
                    current,
                    "rollup superseded; discarding result"
                );
                continue;
            }

            self.events.emit_rollup_completed(&RollupCompletedEvent {
                generation,
                centre_count: view.centres.len(),
                system_count: view.total_systems,
            });
            tracing::info!(
                generation,
                systems = view.total_systems,
                "hierarchy rollup complete"
            );
            return Ok(self.cache.put_at(Topic::Hierarchy, view, stamp));
        }
        Err(EngineError::Cancelled)
    }

    // ---- Writes ----

    /// Save an assessment edit. The create-vs-update branch is decided
    /// by row presence for the (system, control) pair.
    pub fn save_assessment(&self, draft: AssessmentDraft) -> Result<Assessment, EngineError> {
        let tree = self.load_tree()?;
        let (product, _) =
            find_system(&tree, draft.system_id).ok_or(EngineError::UnknownEntity {
                kind: EntityKind::System,
                id: draft.system_id,
            })?;
        let baseline = self.baseline(product.product_id)?;
        if !baseline.contains(draft.control_id) {
            return Err(EngineError::UnknownEntity {
                kind: EntityKind::Control,
                id: draft.control_id,
            });
        }
        let existing = self.find_row(draft.system_id, draft.control_id)?;

        let mutation = Mutation::AssessmentWrite {
            product_id: product.product_id,
            system_id: draft.system_id,
        };
        let guard = OptimisticMutation::begin(&self.cache, &mutation);
        let result = match &existing {
            Some(row) => self.provider.update_assessment(row.assessment_id, &draft),
            None => self.provider.create_assessment(&draft),
        };
        match result {
            Ok(saved) => {
                guard.commit(&mutation);
                self.emit_invalidated(&mutation);
                self.events.emit_assessment_saved(&AssessmentSavedEvent {
                    assessment_id: saved.assessment_id,
                    system_id: saved.system_id,
                    control_id: saved.control_id,
                    status: saved.status,
                    created: existing.is_none(),
                });
                tracing::debug!(
                    assessment_id = saved.assessment_id,
                    system_id = saved.system_id,
                    control_id = saved.control_id,
                    created = existing.is_none(),
                    "assessment saved"
                );
                Ok(saved)
            }
            Err(err) => {
                guard.revert();
                let retryable = err.is_retryable();
                tracing::warn!(
                    system_id = draft.system_id,
                    control_id = draft.control_id,
                    retryable,
                    error = %err,
                    "assessment write failed"
                );
                self.events.emit_write_failed(&WriteFailedEvent {
                    system_id: draft.system_id,
                    control_id: draft.control_id,
                    message: err.to_string(),
                    retryable,
                });
                if retryable {
                    // Keep the rejected draft queued for re-submission.
                    self.autosave.schedule(draft);
                }
                Err(err.into())
            }
        }
    }

    /// Delete the assessment for a (system, control) pair. Deleting a
    /// virtual cell (no persisted row) is a no-op.
    pub fn delete_assessment(
        &self,
        system_id: i64,
        control_id: i64,
    ) -> Result<(), EngineError> {
        let tree = self.load_tree()?;
        let (product, _) = find_system(&tree, system_id).ok_or(EngineError::UnknownEntity {
            kind: EntityKind::System,
            id: system_id,
        })?;
        let Some(row) = self.find_row(system_id, control_id)? else {
            tracing::debug!(system_id, control_id, "delete of virtual cell; nothing to do");
            return Ok(());
        };

        let mutation = Mutation::AssessmentWrite {
            product_id: product.product_id,
            system_id,
        };
        let guard = OptimisticMutation::begin(&self.cache, &mutation);
        match self.provider.delete_assessment(row.assessment_id) {
            Ok(()) => {
                guard.commit(&mutation);
                self.emit_invalidated(&mutation);
                self.events.emit_assessment_deleted(&AssessmentDeletedEvent {
                    assessment_id: row.assessment_id,
                    system_id,
                    control_id,
                });
                Ok(())
            }
            Err(err) => {
                guard.revert();
                self.events.emit_write_failed(&WriteFailedEvent {
                    system_id,
                    control_id,
                    message: err.to_string(),
                    retryable: err.is_retryable(),
                });
                Err(err.into())
            }
        }
    }

    // ---- External mutations ----

    /// A system was created, renamed, or deleted under a product.
    pub fn record_system_changed(&self, product_id: i64, system_id: i64) {
        let mutation = Mutation::SystemChanged { product_id };
        self.cache.record_mutation(&mutation);
        self.emit_invalidated(&mutation);
        self.events.emit_system_changed(&SystemChangedEvent {
            system_id,
            product_id,
        });
    }

    /// A product's baseline entries changed.
    pub fn record_baseline_changed(
        &self,
        product_id: i64,
        entry_count: usize,
    ) -> Result<(), EngineError> {
        let tree = self.load_tree()?;
        let product = self.find_product(&tree, product_id)?;
        let mutation = Mutation::BaselineChanged {
            product_id,
            system_ids: product.system_ids().collect(),
        };
        self.cache.record_mutation(&mutation);
        self.emit_invalidated(&mutation);
        self.events.emit_baseline_changed(&BaselineChangedEvent {
            product_id,
            entry_count,
        });
        Ok(())
    }

    // ---- Autosave ----

    /// Queue an edit for debounced persistence.
    pub fn queue_autosave(&self, draft: AssessmentDraft) {
        self.autosave.schedule(draft);
    }

    /// Manual save: persist a queued edit immediately, cancelling its
    /// timer. Returns `None` when nothing was queued for the pair.
    pub fn flush_autosave(
        &self,
        system_id: i64,
        control_id: i64,
    ) -> Option<Result<Assessment, EngineError>> {
        self.autosave
            .flush((system_id, control_id))
            .map(|draft| self.save_assessment(draft))
    }

    /// Discard a queued edit without saving it.
    pub fn cancel_autosave(&self, system_id: i64, control_id: i64) {
        self.autosave.cancel((system_id, control_id));
    }

    /// Persist every queued edit whose quiet period has elapsed.
    /// Returns the number saved; retryable failures are re-queued.
    pub fn autosave_tick(&self) -> usize {
        let due = self.autosave.drain_due();
        let mut saved = 0;
        for draft in due {
            if self.save_assessment(draft).is_ok() {
                saved += 1;
            }
        }
        saved
    }

    /// Queued edits awaiting their quiet period.
    pub fn autosave_pending(&self) -> usize {
        self.autosave.pending_count()
    }

    // ---- Internals ----

    fn load_tree(&self) -> Result<Vec<CapabilityCentreNode>, EngineError> {
        Ok(self.provider.organization_tree()?)
    }

    fn catalog(&self) -> Result<ControlCatalog, EngineError> {
        Ok(ControlCatalog::new(self.provider.controls()?))
    }

    fn index_for(&self, filter: &AssessmentFilter) -> Result<AssessmentIndex, EngineError> {
        Ok(AssessmentIndex::from_records(
            self.provider.assessments(filter)?,
        ))
    }

    fn find_row(
        &self,
        system_id: i64,
        control_id: i64,
    ) -> Result<Option<Assessment>, EngineError> {
        Ok(self
            .provider
            .assessments(&AssessmentFilter::for_system(system_id))?
            .into_iter()
            .find(|a| a.control_id == control_id))
    }

    fn find_product<'t>(
        &self,
        tree: &'t [CapabilityCentreNode],
        product_id: i64,
    ) -> Result<&'t ProductNode, EngineError> {
        find_product(tree, product_id).ok_or(EngineError::UnknownEntity {
            kind: EntityKind::Product,
            id: product_id,
        })
    }

    /// Cached baseline resolution for one product.
    fn baseline(&self, product_id: i64) -> Result<Arc<ResolvedBaseline>, EngineError> {
        let catalog = self.catalog()?;
        self.baseline_with(product_id, &catalog)
    }

    fn baseline_with(
        &self,
        product_id: i64,
        catalog: &ControlCatalog,
    ) -> Result<Arc<ResolvedBaseline>, EngineError> {
        let topic = Topic::Baseline(product_id);
        if let Some(cached) = self.cache.get::<ResolvedBaseline>(&topic) {
            return Ok(cached);
        }
        let stamp = self.cache.read_stamp();
        let entries = self.provider.baseline_entries(product_id)?;
        let resolved = baseline::resolve(product_id, &entries, catalog)?;
        Ok(self.cache.put_at(topic, resolved, stamp))
    }

    fn emit_invalidated(&self, mutation: &Mutation) {
        self.events.emit_views_invalidated(&ViewsInvalidatedEvent {
            mutation: mutation.describe(),
            topic_count: mutation.invalidates().len(),
        });
    }
}

/// Score one system against a resolved baseline.
fn score_system(
    system: &SystemNode,
    baseline: &ResolvedBaseline,
    index: &AssessmentIndex,
) -> SystemScore {
    let mut acc = ScoreAccumulator::new();
    let mut status_breakdown = StatusBreakdown::default();
    for control in &baseline.controls {
        let status = index.status(system.system_id, control.control_id);
        acc.observe(status);
        status_breakdown.observe(status);
    }
    SystemScore {
        system_id: system.system_id,
        name: system.name.clone(),
        score: acc.compliance_percent(),
        coverage: acc.coverage_percent(),
        assessed_controls: acc.assessed,
        applicable_controls: acc.applicable,
        status_breakdown,
    }
}

/// Group the baseline's controls (already in function/category order)
/// into per-function, per-category accumulators over the given systems.
fn function_breakdown(
    baseline: &ResolvedBaseline,
    systems: &[&SystemNode],
    index: &AssessmentIndex,
) -> Vec<FunctionCompliance> {
    struct CategorySlot {
        code: String,
        name: String,
        acc: ScoreAccumulator,
    }
    struct FunctionSlot {
        code: String,
        name: String,
        order: u32,
        acc: ScoreAccumulator,
        categories: Vec<CategorySlot>,
    }

    let mut slots: Vec<FunctionSlot> = Vec::new();
    for control in &baseline.controls {
        let mut acc = ScoreAccumulator::new();
        for system in systems {
            acc.observe(index.status(system.system_id, control.control_id));
        }

        // Controls arrive sorted, so function and category boundaries
        // are run boundaries.
        let new_function = slots
            .last()
            .map_or(true, |slot| slot.code != control.function_code);
        if new_function {
            slots.push(FunctionSlot {
                code: control.function_code.clone(),
                name: control.function_name.clone(),
                order: control.function_order,
                acc: ScoreAccumulator::new(),
                categories: Vec::new(),
            });
        }
        if let Some(slot) = slots.last_mut() {
            slot.acc.merge(&acc);
            let new_category = slot
                .categories
                .last()
                .map_or(true, |cat| cat.code != control.category_code);
            if new_category {
                slot.categories.push(CategorySlot {
                    code: control.category_code.clone(),
                    name: control.category_name.clone(),
                    acc,
                });
            } else if let Some(cat) = slot.categories.last_mut() {
                cat.acc.merge(&acc);
            }
        }
    }

    slots
        .into_iter()
        .map(|slot| FunctionCompliance {
            function_code: slot.code,
            function_name: slot.name,
            function_order: slot.order,
            score: slot.acc.compliance_percent(),
            assessed_controls: slot.acc.assessed,
            applicable_controls: slot.acc.applicable,
            categories: slot
                .categories
                .into_iter()
                .map(|cat| CategoryCompliance {
                    category_code: cat.code,
                    category_name: cat.name,
                    score: cat.acc.compliance_percent(),
                    assessed_controls: cat.acc.assessed,
                    applicable_controls: cat.acc.applicable,
                })
                .collect(),
        })
        .collect()
}
