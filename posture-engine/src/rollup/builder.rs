//! Rollup builder — walks the tree leaves-first, merging accumulators.
//!
//! Every node's score is the weighted formula applied to the union of
//! its descendants' (control, status) slots. Averaging child
//! percentages is disallowed: it would weight small systems equally
//! with large ones.

use posture_core::config::EngineConfig;
use posture_core::errors::EngineError;
use posture_core::traits::Cancellable;
use posture_core::types::collections::FxHashMap;
use posture_core::types::{CapabilityCentreNode, ProductNode, SystemNode};

use crate::baseline::ResolvedBaseline;
use crate::lookup::AssessmentIndex;
use crate::scoring::ScoreAccumulator;

use super::framework_merge::merge_frameworks_by_name;
use super::types::*;

/// Immutable inputs to one rollup pass.
pub struct RollupInputs<'a> {
    pub tree: &'a [CapabilityCentreNode],
    /// Resolved baselines keyed by product id; a missing key means the
    /// product has no baseline configured and rolls up as unassessed.
    pub baselines: &'a FxHashMap<i64, ResolvedBaseline>,
    pub index: &'a AssessmentIndex,
}

pub struct RollupBuilder {
    critical_threshold: u32,
    attention_cap: usize,
}

impl RollupBuilder {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            critical_threshold: config.effective_critical_threshold(),
            attention_cap: config.effective_attention_cap(),
        }
    }

    /// Run a full rollup. Cancellation is polled per product; a
    /// cancelled walk returns `EngineError::Cancelled` and produces no
    /// partial view.
    pub fn build(
        &self,
        inputs: &RollupInputs<'_>,
        cancel: &dyn Cancellable,
        generation: u64,
    ) -> Result<HierarchyView, EngineError> {
        let mut centres = Vec::with_capacity(inputs.tree.len());
        let mut total_systems = 0;

        for cc in inputs.tree {
            let mut cc_acc = ScoreAccumulator::new();
            let mut frameworks = Vec::with_capacity(cc.frameworks.len());

            for fw in &cc.frameworks {
                let mut fw_acc = ScoreAccumulator::new();
                let mut products = Vec::with_capacity(fw.products.len());

                for product in &fw.products {
                    if cancel.is_cancelled() {
                        return Err(EngineError::Cancelled);
                    }
                    let rolled = self.roll_product(product, inputs);
                    fw_acc.merge(&rolled.1);
                    products.push(rolled.0);
                }

                cc_acc.merge(&fw_acc);
                frameworks.push(self.finish_framework(fw.framework_id, fw.name.clone(), fw_acc, products));
            }

            let centre = self.finish_centre(cc.capability_centre_id, cc.name.clone(), cc_acc, frameworks);
            total_systems += centre.total_systems;
            centres.push(centre);
        }

        let framework_summaries = merge_frameworks_by_name(&centres);

        Ok(HierarchyView {
            generation,
            centres,
            framework_summaries,
            total_systems,
        })
    }

    fn roll_product(
        &self,
        product: &ProductNode,
        inputs: &RollupInputs<'_>,
    ) -> (ProductRollup, ScoreAccumulator) {
        let baseline = inputs.baselines.get(&product.product_id);
        let mut product_acc = ScoreAccumulator::new();
        let mut systems = Vec::with_capacity(product.systems.len());
        let mut unassessed = 0;

        for system in &product.systems {
            let system_acc = self.roll_system(system, baseline, inputs.index);
            if system_acc.assessed == 0 {
                unassessed += 1;
            }
            product_acc.merge(&system_acc);
            systems.push(SystemRollup {
                system_id: system.system_id,
                name: system.name.clone(),
                score: system_acc.compliance_percent(),
                assessed_controls: system_acc.assessed,
                applicable_controls: system_acc.applicable,
            });
        }

        let attention = self.attention_list(&systems);
        let rollup = ProductRollup {
            product_id: product.product_id,
            name: product.name.clone(),
            score: product_acc.compliance_percent(),
            assessed_controls: product_acc.assessed,
            applicable_controls: product_acc.applicable,
            total_systems: systems.len(),
            unassessed_systems: unassessed,
            attention,
            has_baseline: baseline.is_some(),
            systems,
        };
        (rollup, product_acc)
    }

    fn roll_system(
        &self,
        system: &SystemNode,
        baseline: Option<&ResolvedBaseline>,
        index: &AssessmentIndex,
    ) -> ScoreAccumulator {
        let mut acc = ScoreAccumulator::new();
        if let Some(baseline) = baseline {
            for control in &baseline.controls {
                acc.observe(index.status(system.system_id, control.control_id));
            }
        }
        acc
    }

    /// Below-threshold systems, worst first, capped. Systems with no
    /// applicable controls are excluded — they are reported through the
    /// unassessed counter instead.
    fn attention_list(&self, systems: &[SystemRollup]) -> Vec<AttentionEntry> {
        let mut entries: Vec<AttentionEntry> = systems
            .iter()
            .filter(|s| s.applicable_controls > 0 && s.score < self.critical_threshold)
            .map(|s| AttentionEntry {
                system_id: s.system_id,
                name: s.name.clone(),
                score: s.score,
            })
            .collect();
        entries.sort_by(|a, b| a.score.cmp(&b.score).then_with(|| a.name.cmp(&b.name)));
        entries.truncate(self.attention_cap);
        entries
    }

    fn finish_framework(
        &self,
        framework_id: i64,
        name: String,
        acc: ScoreAccumulator,
        products: Vec<ProductRollup>,
    ) -> FrameworkRollup {
        let attention = self.merge_attention(products.iter().map(|p| p.attention.as_slice()));
        FrameworkRollup {
            framework_id,
            name,
            score: acc.compliance_percent(),
            assessed_controls: acc.assessed,
            applicable_controls: acc.applicable,
            total_systems: products.iter().map(|p| p.total_systems).sum(),
            unassessed_systems: products.iter().map(|p| p.unassessed_systems).sum(),
            attention,
            products,
        }
    }

    fn finish_centre(
        &self,
        capability_centre_id: i64,
        name: String,
        acc: ScoreAccumulator,
        frameworks: Vec<FrameworkRollup>,
    ) -> CapabilityCentreRollup {
        let attention = self.merge_attention(frameworks.iter().map(|f| f.attention.as_slice()));
        CapabilityCentreRollup {
            capability_centre_id,
            name,
            score: acc.compliance_percent(),
            assessed_controls: acc.assessed,
            applicable_controls: acc.applicable,
            total_systems: frameworks.iter().map(|f| f.total_systems).sum(),
            unassessed_systems: frameworks.iter().map(|f| f.unassessed_systems).sum(),
            attention,
            frameworks,
        }
    }

    /// Re-rank child attention lists into the parent's capped list.
    fn merge_attention<'a>(
        &self,
        children: impl Iterator<Item = &'a [AttentionEntry]>,
    ) -> Vec<AttentionEntry> {
        let mut entries: Vec<AttentionEntry> = children.flatten().cloned().collect();
        entries.sort_by(|a, b| a.score.cmp(&b.score).then_with(|| a.name.cmp(&b.name)));
        entries.truncate(self.attention_cap);
        entries
    }
}
