//! Content-addressed pinning of source files.
//!
//! A pin lives at `{dest_dir}/{stem}-{sha256[..12]}{ext}`. Identical content
//! always lands on the same path and an existing pin is never rewritten.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use swft_core::constants::{DEFAULT_PINNED_EXTENSION, PINNED_HASH_PREFIX_LEN};
use swft_core::digest::sha256_file;
use swft_core::errors::FileError;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PinnedFile {
    pub path: PathBuf,
    /// Full SHA-256 hex of the content.
    pub sha256: String,
}

/// Copy `source` into `dest_dir` under a hash-stamped name.
///
/// The copy goes to a temporary sibling first and is hard-linked into place,
/// so readers never see a partial pin and a racing pin is never replaced.
pub fn pin_source_file(source: &Path, dest_dir: &Path, stem: &str) -> Result<PinnedFile, FileError> {
    let sha256 = sha256_file(source)?;
    fs::create_dir_all(dest_dir).map_err(|e| FileError::CreateDir {
        path: dest_dir.to_path_buf(),
        message: e.to_string(),
    })?;

    let filename = format!(
        "{stem}-{}{}",
        &sha256[..PINNED_HASH_PREFIX_LEN],
        extension_of(source)
    );
    let dest = dest_dir.join(filename);

    if !dest.exists() {
        let tmp = dest_dir.join(format!(
            ".{}.{}-{}.tmp",
            dest.file_name().and_then(|n| n.to_str()).unwrap_or("pin"),
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        fs::copy(source, &tmp).map_err(|e| FileError::Copy {
            from: source.to_path_buf(),
            to: tmp.clone(),
            message: e.to_string(),
        })?;
        let published = publish(&tmp, &dest).map_err(|e| FileError::Copy {
            from: source.to_path_buf(),
            to: dest.clone(),
            message: e.to_string(),
        })?;
        if published {
            tracing::debug!(source = %source.display(), pinned = %dest.display(), "pinned file");
        } else {
            tracing::debug!(pinned = %dest.display(), "pin created concurrently");
        }
    }

    Ok(PinnedFile { path: dest, sha256 })
}

/// Hard-link `tmp` into place, then drop `tmp`. Returns false when `dest`
/// already existed; an existing pin is left untouched.
fn publish(tmp: &Path, dest: &Path) -> io::Result<bool> {
    let linked = match fs::hard_link(tmp, dest) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e),
    };
    let _ = fs::remove_file(tmp);
    linked
}

/// Every suffix of the file name (`.tar.gz`), or `.json` when there is none.
pub fn extension_of(path: &Path) -> String {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return DEFAULT_PINNED_EXTENSION.to_string();
    };
    if name.ends_with('.') {
        return DEFAULT_PINNED_EXTENSION.to_string();
    }
    match name.trim_start_matches('.').find('.') {
        Some(idx) => name.trim_start_matches('.')[idx..].to_string(),
        None => DEFAULT_PINNED_EXTENSION.to_string(),
    }
}
