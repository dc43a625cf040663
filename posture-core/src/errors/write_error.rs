//! Mutation errors.
//!
//! A failed write is a no-op on stored state: the coordinator restores
//! its optimistic snapshot and the rejected draft stays queued for
//! re-submission.

use super::error_code::{self, PostureErrorCode};
use super::StorageError;

/// Errors from assessment create/update/delete paths.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// Network/storage failure. Retryable, never fatal.
    #[error("Transient I/O failure: {message}")]
    TransientIo { message: String },

    /// Reserved for a multi-writer deployment: the write carried an
    /// expected prior stamp and the store held something newer.
    #[error("Conflicting write: expected stamp {expected}, found {found}")]
    Conflict { expected: u64, found: u64 },
}

impl From<StorageError> for WriteError {
    fn from(err: StorageError) -> Self {
        Self::TransientIo {
            message: err.to_string(),
        }
    }
}

impl PostureErrorCode for WriteError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::TransientIo { .. } => error_code::WRITE_TRANSIENT_IO,
            Self::Conflict { .. } => error_code::WRITE_CONFLICT,
        }
    }
}

impl WriteError {
    /// True if the caller may simply retry the same write.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransientIo { .. })
    }
}
