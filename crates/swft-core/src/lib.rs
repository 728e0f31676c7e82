//! # swft-core
//!
//! Foundation crate for the SWFT compliance backend.
//! Defines the error taxonomy, configuration, tracing setup, digests,
//! JSON path helpers and the normalized document models shared by the
//! storage and ingestion crates.

pub mod config;
pub mod constants;
pub mod digest;
pub mod errors;
pub mod json;
pub mod models;
pub mod strings;
pub mod tracing;

pub use config::SwftConfig;
pub use errors::{
    ConfigError, FileError, FormatError, IngestError, RegistryError, SourceError, StorageError,
};
