//! SwftErrorCode trait for boundary conversion.

/// Every error enum provides a stable code string so that whatever boundary
/// calls into this crate can map failures without matching on messages.
pub trait SwftErrorCode {
    /// Returns the error code string (e.g., "FORMAT_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted boundary string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const FORMAT_ERROR: &str = "FORMAT_ERROR";
pub const UNSUPPORTED_FEATURE: &str = "UNSUPPORTED_FEATURE";
pub const VERSION_CONFLICT: &str = "VERSION_CONFLICT";
pub const NOT_FOUND: &str = "NOT_FOUND";
pub const ALREADY_EXISTS: &str = "ALREADY_EXISTS";
pub const INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";
pub const CHECKSUM_MISMATCH: &str = "CHECKSUM_MISMATCH";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const DB_BUSY: &str = "DB_BUSY";
pub const IO_ERROR: &str = "IO_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const SOURCE_ERROR: &str = "SOURCE_ERROR";
