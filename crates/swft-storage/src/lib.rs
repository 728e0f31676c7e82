//! # swft-storage
//!
//! SQLite persistence for the SWFT compliance backend.
//! Serialized writer plus read pool, an explicit transaction combinator,
//! checksummed forward-only migrations, per-table query modules and the
//! version registry.

pub mod connection;
pub mod migrations;
pub mod queries;
pub mod registry;

pub use connection::DatabaseManager;
pub use registry::ensure_version;

use swft_core::errors::StorageError;

/// Convert a rusqlite error via [`StorageError::sqlite`], which classifies
/// lock contention as `DbBusy`.
pub(crate) fn to_storage_err(e: rusqlite::Error) -> StorageError {
    StorageError::sqlite(e.to_string())
}
