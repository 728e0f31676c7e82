//! Filesystem layout configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::FileError;

/// Where pinned authority documents, evidence and outputs live.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    /// Root directory. Default: `~/.swft`.
    pub home: Option<PathBuf>,
    /// Evidence store. Default: `{home}/store`.
    pub store: Option<PathBuf>,
    /// Pinned authority documents. Default: `{home}/pinned`.
    pub pinned: Option<PathBuf>,
    /// Generated outputs. Default: `{home}/outputs`.
    pub outputs: Option<PathBuf>,
}

impl PathsConfig {
    pub fn effective_home(&self) -> PathBuf {
        self.home
            .clone()
            .or_else(|| home_dir().map(|h| h.join(".swft")))
            .unwrap_or_else(|| PathBuf::from(".swft"))
    }

    pub fn effective_store(&self) -> PathBuf {
        self.store
            .clone()
            .unwrap_or_else(|| self.effective_home().join("store"))
    }

    pub fn effective_pinned(&self) -> PathBuf {
        self.pinned
            .clone()
            .unwrap_or_else(|| self.effective_home().join("pinned"))
    }

    pub fn effective_outputs(&self) -> PathBuf {
        self.outputs
            .clone()
            .unwrap_or_else(|| self.effective_home().join("outputs"))
    }

    /// Create every configured directory.
    pub fn ensure(&self) -> Result<(), FileError> {
        for dir in [
            self.effective_home(),
            self.effective_store(),
            self.effective_pinned(),
            self.effective_outputs(),
        ] {
            create_dir(&dir)?;
        }
        Ok(())
    }
}

fn create_dir(path: &Path) -> Result<(), FileError> {
    std::fs::create_dir_all(path).map_err(|e| FileError::CreateDir {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
