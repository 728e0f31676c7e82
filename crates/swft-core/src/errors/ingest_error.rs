//! Aggregate error returned by importer, evidence and project operations.

use super::error_code::{self, SwftErrorCode};
use super::{FileError, FormatError, RegistryError, SourceError, StorageError};

/// Errors surfaced at the ingestion boundary.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    #[error(
        "Version conflict: '{name}' ({kind}) already pinned with hash {existing_hash}, \
         refusing content {incoming_hash}"
    )]
    VersionConflict {
        kind: String,
        name: String,
        existing_hash: String,
        incoming_hash: String,
    },

    /// `hint` is appended verbatim; empty when there is nothing to add.
    #[error("{entity} '{key}' not found{hint}")]
    NotFound {
        entity: String,
        key: String,
        hint: String,
    },

    #[error("{entity} '{key}' already exists")]
    AlreadyExists { entity: String, key: String },

    #[error("Invalid {field}: {message}")]
    InvalidArgument { field: String, message: String },

    #[error("File error: {0}")]
    File(#[from] FileError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

impl From<RegistryError> for IngestError {
    fn from(error: RegistryError) -> Self {
        match error {
            RegistryError::VersionConflict {
                kind,
                name,
                existing_hash,
                incoming_hash,
            } => Self::VersionConflict {
                kind,
                name,
                existing_hash,
                incoming_hash,
            },
            RegistryError::Storage(e) => Self::Storage(e),
        }
    }
}

impl IngestError {
    pub fn not_found(entity: &str, key: impl Into<String>) -> Self {
        Self::not_found_with_hint(entity, key, "")
    }

    /// `hint` should read as a trailing sentence, e.g. `". Import the catalog first."`.
    pub fn not_found_with_hint(entity: &str, key: impl Into<String>, hint: &str) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            key: key.into(),
            hint: hint.to_string(),
        }
    }

    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// True when the caller can fix the failure (4xx-equivalent).
    pub fn is_actionable(&self) -> bool {
        matches!(
            self,
            Self::Format(_)
                | Self::VersionConflict { .. }
                | Self::NotFound { .. }
                | Self::AlreadyExists { .. }
                | Self::InvalidArgument { .. }
        )
    }

    /// Message safe to show across a trust boundary.
    pub fn public_message(&self) -> String {
        if self.is_actionable() {
            self.to_string()
        } else {
            "internal error".to_string()
        }
    }
}

impl SwftErrorCode for IngestError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Format(e) => e.error_code(),
            Self::VersionConflict { .. } => error_code::VERSION_CONFLICT,
            Self::NotFound { .. } => error_code::NOT_FOUND,
            Self::AlreadyExists { .. } => error_code::ALREADY_EXISTS,
            Self::InvalidArgument { .. } => error_code::INVALID_ARGUMENT,
            Self::File(e) => e.error_code(),
            Self::Storage(e) => e.error_code(),
            Self::Source(e) => e.error_code(),
        }
    }
}
