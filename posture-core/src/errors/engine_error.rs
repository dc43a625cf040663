//! Engine operation errors.
//! Aggregates collaborator errors via `From` conversions.

use std::fmt;

use super::error_code::{self, PostureErrorCode};
use super::{StorageError, WriteError};

/// Kind of entity referenced by an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    CapabilityCentre,
    Framework,
    Product,
    System,
    Control,
    Assessment,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::CapabilityCentre => "capability centre",
            Self::Framework => "framework",
            Self::Product => "product",
            Self::System => "system",
            Self::Control => "control",
            Self::Assessment => "assessment",
        };
        f.write_str(s)
    }
}

/// Errors that can occur during engine operations.
///
/// None of these are fatal to the process; every failure is scoped to
/// the operation that raised it and leaves prior valid caches intact.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The product has zero baseline entries. Distinct from a baseline
    /// that deliberately marks every control inapplicable.
    #[error("No baseline configured for product {product_id}")]
    NoBaselineConfigured { product_id: i64 },

    #[error("Unknown {kind} {id}")]
    UnknownEntity { kind: EntityKind, id: i64 },

    /// A long-running rollup was cancelled or superseded before completion.
    #[error("Operation cancelled")]
    Cancelled,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Write error: {0}")]
    Write(#[from] WriteError),
}

impl PostureErrorCode for EngineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NoBaselineConfigured { .. } => error_code::NO_BASELINE_CONFIGURED,
            Self::UnknownEntity { .. } => error_code::UNKNOWN_ENTITY,
            Self::Cancelled => error_code::CANCELLED,
            Self::Storage(e) => e.error_code(),
            Self::Write(e) => e.error_code(),
        }
    }
}
