//! Filesystem errors raised while hashing, pinning or inspecting files.

use std::path::PathBuf;

use super::error_code::{self, SwftErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("cannot read {path}: {message}")]
    Unreadable { path: PathBuf, message: String },

    #[error("cannot create directory {path}: {message}")]
    CreateDir { path: PathBuf, message: String },

    #[error("cannot copy {from} to {to}: {message}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        message: String,
    },

    #[error("cannot write {path}: {message}")]
    Write { path: PathBuf, message: String },
}

impl SwftErrorCode for FileError {
    fn error_code(&self) -> &'static str {
        error_code::IO_ERROR
    }
}
