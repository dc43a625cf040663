//! Error handling for Posture.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod engine_error;
pub mod error_code;
pub mod storage_error;
pub mod write_error;

pub use config_error::ConfigError;
pub use engine_error::{EngineError, EntityKind};
pub use error_code::PostureErrorCode;
pub use storage_error::StorageError;
pub use write_error::WriteError;
