//! Query modules, one per table group.

pub mod assessments;
pub mod baseline;
pub mod controls;
pub mod organization;

use posture_core::errors::StorageError;

pub(crate) fn sqlite_err(e: rusqlite::Error) -> StorageError {
    StorageError::Sqlite {
        message: e.to_string(),
    }
}
