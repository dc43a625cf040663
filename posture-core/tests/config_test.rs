//! Tests for the Posture configuration layer.

use std::path::Path;

use posture_core::config::PostureConfig;
use posture_core::errors::ConfigError;

#[test]
fn test_defaults_when_no_project_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = PostureConfig::load(dir.path()).unwrap();
    assert_eq!(config.engine.effective_critical_threshold(), 60);
    assert_eq!(config.engine.effective_gap_cap(), 10);
    assert_eq!(config.engine.effective_autosave_quiet_ms(), 3000);
}

#[test]
fn test_project_config_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("posture.toml"),
        "[engine]\ncritical_threshold = 80\nattention_cap = 3\n",
    )
    .unwrap();

    let config = PostureConfig::load(dir.path()).unwrap();
    assert_eq!(config.engine.effective_critical_threshold(), 80);
    assert_eq!(config.engine.effective_attention_cap(), 3);
    // Untouched fields keep compiled defaults.
    assert_eq!(config.engine.effective_gap_cap(), 10);
}

#[test]
fn test_invalid_project_toml_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("posture.toml"), "engine = [broken").unwrap();

    let err = PostureConfig::load(dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn test_validation_runs_on_load() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("posture.toml"), "[engine]\ngap_cap = 0\n").unwrap();

    let err = PostureConfig::load(dir.path()).unwrap_err();
    match err {
        ConfigError::Validation { field, .. } => assert_eq!(field, "engine.gap_cap"),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn test_missing_directory_yields_defaults() {
    // A root without posture.toml behaves like an empty config.
    let config = PostureConfig::load(Path::new("/nonexistent/posture/root")).unwrap();
    assert_eq!(config.engine.effective_critical_threshold(), 60);
}
