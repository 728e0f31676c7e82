//! Authority document downloads.
//!
//! Fetching goes through [`Fetch`], so tests and offline callers can supply a
//! closure. Downloads only write files; importing them is a separate step and
//! never overlaps a database transaction.

pub mod azure;
pub mod nist;

use std::fs;
use std::path::{Path, PathBuf};

use swft_core::errors::{FileError, SourceError};

pub use azure::AzurePolicySetSource;
pub use nist::{BaselineLevel, NistSp80053Source, OscalFormat};

/// Retrieve the bytes at a URL.
pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, SourceError>;
}

impl<F> Fetch for F
where
    F: Fn(&str) -> Result<Vec<u8>, SourceError>,
{
    fn fetch(&self, url: &str) -> Result<Vec<u8>, SourceError> {
        self(url)
    }
}

/// Blocking HTTP fetcher; any non-2xx status is an error.
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "http")]
impl HttpFetcher {
    pub fn new() -> Result<Self, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .user_agent(concat!("swft/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SourceError::Download {
                url: String::new(),
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

#[cfg(feature = "http")]
impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, SourceError> {
        let download_err = |e: reqwest::Error| SourceError::Download {
            url: url.to_string(),
            message: e.to_string(),
        };
        let response = self.client.get(url).send().map_err(download_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.bytes().map_err(download_err)?;
        tracing::debug!(url, bytes = body.len(), "downloaded");
        Ok(body.to_vec())
    }
}

/// Write downloaded bytes to `dest_dir/filename`, creating the directory.
pub(crate) fn write_download(dest_dir: &Path, filename: &str, data: &[u8]) -> Result<PathBuf, FileError> {
    fs::create_dir_all(dest_dir).map_err(|e| FileError::CreateDir {
        path: dest_dir.to_path_buf(),
        message: e.to_string(),
    })?;
    let target = dest_dir.join(filename);
    fs::write(&target, data).map_err(|e| FileError::Write {
        path: target.clone(),
        message: e.to_string(),
    })?;
    Ok(target)
}
