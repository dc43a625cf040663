//! Top-level Posture configuration with 3-layer resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::EngineConfig;
use crate::errors::ConfigError;

/// Top-level configuration.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`POSTURE_*`)
/// 2. Project config (`posture.toml` in project root)
/// 3. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PostureConfig {
    pub engine: EngineConfig,
}

impl PostureConfig {
    /// Load configuration with 3-layer resolution.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let project_config_path = root.join("posture.toml");
        if project_config_path.exists() {
            let raw = std::fs::read_to_string(&project_config_path).map_err(|e| {
                ConfigError::Parse {
                    path: project_config_path.display().to_string(),
                    message: e.to_string(),
                }
            })?;
            config = toml::from_str(&raw).map_err(|e| ConfigError::Parse {
                path: project_config_path.display().to_string(),
                message: e.to_string(),
            })?;
        }

        Self::apply_env_overrides(&mut config);
        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::Parse {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    fn apply_env_overrides(config: &mut Self) {
        if let Some(v) = env_parse::<u32>("POSTURE_CRITICAL_THRESHOLD") {
            config.engine.critical_threshold = Some(v);
        }
        if let Some(v) = env_parse::<usize>("POSTURE_ATTENTION_CAP") {
            config.engine.attention_cap = Some(v);
        }
        if let Some(v) = env_parse::<usize>("POSTURE_GAP_CAP") {
            config.engine.gap_cap = Some(v);
        }
        if let Some(v) = env_parse::<u64>("POSTURE_AUTOSAVE_QUIET_MS") {
            config.engine.autosave_quiet_ms = Some(v);
        }
    }

    /// Validate the configuration values.
    pub fn validate(config: &Self) -> Result<(), ConfigError> {
        if let Some(threshold) = config.engine.critical_threshold {
            if threshold > 100 {
                return Err(ConfigError::Validation {
                    field: "engine.critical_threshold".to_string(),
                    message: "must be between 0 and 100".to_string(),
                });
            }
        }
        if config.engine.gap_cap == Some(0) {
            return Err(ConfigError::Validation {
                field: "engine.gap_cap".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
