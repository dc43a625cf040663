//! Engine tunables.

use serde::{Deserialize, Serialize};

/// Configuration for the aggregation engine.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Score below which a system is surfaced for attention. Default: 60.
    pub critical_threshold: Option<u32>,
    /// Cap on the per-node below-threshold system list. Default: 5.
    pub attention_cap: Option<usize>,
    /// Cap on the displayed gap list. Totals stay uncapped. Default: 10.
    pub gap_cap: Option<usize>,
    /// Autosave quiet period in milliseconds. Default: 3000.
    pub autosave_quiet_ms: Option<u64>,
    /// Maximum cached view entries. Default: 1024.
    pub cache_capacity: Option<u64>,
}

impl EngineConfig {
    /// Returns the effective critical threshold, defaulting to 60.
    pub fn effective_critical_threshold(&self) -> u32 {
        self.critical_threshold.unwrap_or(60)
    }

    /// Returns the effective attention list cap, defaulting to 5.
    pub fn effective_attention_cap(&self) -> usize {
        self.attention_cap.unwrap_or(5)
    }

    /// Returns the effective gap list cap, defaulting to 10.
    pub fn effective_gap_cap(&self) -> usize {
        self.gap_cap.unwrap_or(10)
    }

    /// Returns the effective autosave quiet period, defaulting to 3000 ms.
    pub fn effective_autosave_quiet_ms(&self) -> u64 {
        self.autosave_quiet_ms.unwrap_or(3000)
    }

    /// Returns the effective cache capacity, defaulting to 1024 entries.
    pub fn effective_cache_capacity(&self) -> u64 {
        self.cache_capacity.unwrap_or(1024)
    }
}
