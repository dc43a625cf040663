//! Configuration system for Posture.
//! TOML-based, 3-layer resolution: env > project > defaults.

pub mod engine_config;
pub mod posture_config;

pub use engine_config::EngineConfig;
pub use posture_config::PostureConfig;
