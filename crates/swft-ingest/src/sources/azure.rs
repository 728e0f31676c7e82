//! Built-in Azure Policy set definitions.

use std::path::{Path, PathBuf};

use swft_core::errors::{IngestError, SourceError};

use super::{write_download, Fetch};
use crate::validation::path_segment;

pub const AZURE_POLICY_BASE_URL_ENV: &str = "SWFT_AZURE_POLICY_BASE_URL";

pub const DEFAULT_AZURE_POLICY_URL_TEMPLATE: &str = "https://raw.githubusercontent.com/Azure/azure-policy/master/built-in-policies/policySetDefinitions/Regulatory%20Compliance/{filename}";

/// Policy set definitions addressed by file name through a `{filename}`
/// URL template.
pub struct AzurePolicySetSource<F> {
    base_url_template: String,
    fetcher: F,
}

impl<F: Fetch> AzurePolicySetSource<F> {
    /// Uses `template`, else `SWFT_AZURE_POLICY_BASE_URL`, else the GitHub
    /// built-in policy tree. The template must contain `{filename}`.
    pub fn new(fetcher: F, template: Option<&str>) -> Result<Self, SourceError> {
        let base_url_template = template
            .filter(|t| !t.is_empty())
            .map(String::from)
            .or_else(|| {
                std::env::var(AZURE_POLICY_BASE_URL_ENV)
                    .ok()
                    .filter(|t| !t.is_empty())
            })
            .unwrap_or_else(|| DEFAULT_AZURE_POLICY_URL_TEMPLATE.to_string());

        if !base_url_template.contains("{filename}") {
            return Err(SourceError::BadTemplate {
                template: base_url_template,
                placeholder: "{filename}".to_string(),
            });
        }
        Ok(Self {
            base_url_template,
            fetcher,
        })
    }

    pub fn url_for(&self, filename: &str) -> String {
        self.base_url_template.replace("{filename}", filename)
    }

    pub fn fetch(&self, filename: &str) -> Result<Vec<u8>, SourceError> {
        self.fetcher.fetch(&self.url_for(filename))
    }

    /// Fetch `filename` and write it to `dest_dir/filename`.
    pub fn download(&self, filename: &str, dest_dir: &Path) -> Result<PathBuf, IngestError> {
        let filename = path_segment("filename", filename)?;
        let data = self.fetch(filename)?;
        let target = write_download(dest_dir, filename, &data)?;
        tracing::info!(filename, path = %target.display(), "downloaded policy set definition");
        Ok(target)
    }
}
