//! Configuration errors.

use super::error_code::{self, PostureErrorCode};

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Invalid value for {field}: {message}")]
    Validation { field: String, message: String },
}

impl PostureErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Parse { .. } => error_code::CONFIG_PARSE,
            Self::Validation { .. } => error_code::CONFIG_VALIDATION,
        }
    }
}
