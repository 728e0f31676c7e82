//! Error handling for SWFT.
//! One error enum per subsystem, `thiserror` only.

pub mod config_error;
pub mod error_code;
pub mod file_error;
pub mod format_error;
pub mod ingest_error;
pub mod registry_error;
pub mod source_error;
pub mod storage_error;

pub use config_error::ConfigError;
pub use error_code::SwftErrorCode;
pub use file_error::FileError;
pub use format_error::FormatError;
pub use ingest_error::IngestError;
pub use registry_error::RegistryError;
pub use source_error::SourceError;
pub use storage_error::StorageError;
