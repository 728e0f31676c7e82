//! Storage-layer errors for SQLite operations and migrations.

use super::error_code::{self, SwftErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("database busy: {message}")]
    DbBusy { message: String },

    #[error("migration {filename} failed: {message}")]
    MigrationFailed { filename: String, message: String },

    #[error("checksum mismatch for {filename}: recorded {recorded} != on-disk {on_disk}")]
    ChecksumMismatch {
        filename: String,
        recorded: String,
        on_disk: String,
    },

    #[error("cannot read migration source {path}: {message}")]
    MigrationSource { path: String, message: String },

    #[error("lock poisoned: {what}")]
    LockPoisoned { what: String },
}

impl StorageError {
    /// Wrap a rusqlite-formatted message, classifying busy/locked failures.
    pub fn sqlite(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_ascii_lowercase();
        if lower.contains("database is locked") || lower.contains("database is busy") {
            Self::DbBusy { message }
        } else {
            Self::SqliteError { message }
        }
    }
}

impl SwftErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DbBusy { .. } => error_code::DB_BUSY,
            Self::MigrationFailed { .. } | Self::MigrationSource { .. } => {
                error_code::MIGRATION_FAILED
            }
            Self::ChecksumMismatch { .. } => error_code::CHECKSUM_MISMATCH,
            _ => error_code::STORAGE_ERROR,
        }
    }
}
