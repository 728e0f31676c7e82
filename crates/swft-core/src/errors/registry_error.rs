//! Version registry errors.

use super::error_code::{self, SwftErrorCode};
use super::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error(
        "version '{name}' for kind '{kind}' already exists with hash {existing_hash} \
         (incoming {incoming_hash}); use a new name or remove the existing record before re-importing"
    )]
    VersionConflict {
        kind: String,
        name: String,
        existing_hash: String,
        incoming_hash: String,
    },

    #[error("{0}")]
    Storage(#[from] StorageError),
}

impl SwftErrorCode for RegistryError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::VersionConflict { .. } => error_code::VERSION_CONFLICT,
            Self::Storage(e) => e.error_code(),
        }
    }
}
