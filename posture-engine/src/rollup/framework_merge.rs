//! Cross-branch framework summary.
//!
//! Keyed reduction over the flattened framework list: frameworks with
//! the same case-insensitive name merge into one summary row regardless
//! of which capability centre they sit under. Counts are summed, scores
//! averaged, and every contributing centre name retained.

use posture_core::types::collections::FxHashMap;

use super::types::{CapabilityCentreRollup, FrameworkSummary};

struct MergeSlot {
    display_name: String,
    cc_names: Vec<String>,
    product_count: usize,
    system_count: usize,
    score_sum: u64,
    contributors: u64,
}

/// Merge framework rollups by case-insensitive name.
pub fn merge_frameworks_by_name(centres: &[CapabilityCentreRollup]) -> Vec<FrameworkSummary> {
    let mut slots: FxHashMap<String, MergeSlot> = FxHashMap::default();
    // Keep first-encounter order for a stable output.
    let mut order: Vec<String> = Vec::new();

    for centre in centres {
        for framework in &centre.frameworks {
            let key = framework.name.to_lowercase();
            let slot = slots.entry(key.clone()).or_insert_with(|| {
                order.push(key);
                MergeSlot {
                    display_name: framework.name.clone(),
                    cc_names: Vec::new(),
                    product_count: 0,
                    system_count: 0,
                    score_sum: 0,
                    contributors: 0,
                }
            });
            slot.product_count += framework.products.len();
            slot.system_count += framework.total_systems;
            slot.score_sum += u64::from(framework.score);
            slot.contributors += 1;
            if !slot.cc_names.contains(&centre.name) {
                slot.cc_names.push(centre.name.clone());
            }
        }
    }

    order
        .into_iter()
        .filter_map(|key| slots.remove(&key))
        .map(|slot| FrameworkSummary {
            name: slot.display_name,
            cc_names: slot.cc_names,
            product_count: slot.product_count,
            system_count: slot.system_count,
            score: ((2 * slot.score_sum + slot.contributors) / (2 * slot.contributors)) as u32,
        })
        .collect()
}
