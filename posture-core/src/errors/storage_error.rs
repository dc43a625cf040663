//! Storage collaborator errors.

use super::error_code::{self, PostureErrorCode};

/// Errors surfaced by the persistence collaborator.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    Sqlite { message: String },

    #[error("Migration v{version} failed: {message}")]
    Migration { version: u32, message: String },

    #[error("Row not found: {what}")]
    NotFound { what: String },
}

impl PostureErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Migration { .. } => error_code::MIGRATION_ERROR,
            _ => error_code::STORAGE_ERROR,
        }
    }
}
