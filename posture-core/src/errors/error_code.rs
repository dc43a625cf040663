//! Stable error codes for every subsystem error.
//!
//! Codes cross the presentation boundary unchanged; messages may be
//! reworded freely.

/// Maps an error to a stable machine-readable code.
pub trait PostureErrorCode {
    fn error_code(&self) -> &'static str;
}

pub const NO_BASELINE_CONFIGURED: &str = "POSTURE_NO_BASELINE";
pub const UNKNOWN_ENTITY: &str = "POSTURE_UNKNOWN_ENTITY";
pub const CANCELLED: &str = "POSTURE_CANCELLED";

pub const WRITE_CONFLICT: &str = "POSTURE_WRITE_CONFLICT";
pub const WRITE_TRANSIENT_IO: &str = "POSTURE_WRITE_TRANSIENT_IO";

pub const STORAGE_ERROR: &str = "POSTURE_STORAGE_ERROR";
pub const MIGRATION_ERROR: &str = "POSTURE_MIGRATION_ERROR";

pub const CONFIG_PARSE: &str = "POSTURE_CONFIG_PARSE";
pub const CONFIG_VALIDATION: &str = "POSTURE_CONFIG_VALIDATION";
