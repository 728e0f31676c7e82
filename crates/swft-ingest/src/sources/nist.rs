//! NIST SP 800-53 Rev5 OSCAL content from the usnistgov/oscal-content repository.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use swft_core::errors::{IngestError, SourceError};

use super::{write_download, Fetch};

pub const DEFAULT_NIST_VERSION: &str = "v1.3.0";

pub const DEFAULT_NIST_URL_TEMPLATE: &str =
    "https://raw.githubusercontent.com/usnistgov/oscal-content/{version}/nist.gov/SP800-53/rev5/{fmt}/{filename}";

const CATALOG_BASENAME: &str = "NIST_SP-800-53_rev5_catalog";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OscalFormat {
    #[default]
    Json,
    Yaml,
    Xml,
}

impl OscalFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Xml => "xml",
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Self::Json => ".json",
            Self::Yaml => ".yaml",
            Self::Xml => ".xml",
        }
    }
}

impl FromStr for OscalFormat {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" => Ok(Self::Yaml),
            "xml" => Ok(Self::Xml),
            _ => Err(SourceError::UnsupportedFormat {
                format: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaselineLevel {
    Low,
    Moderate,
    High,
    Privacy,
}

impl BaselineLevel {
    fn variant(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Moderate => "MODERATE",
            Self::High => "HIGH",
            Self::Privacy => "PRIVACY",
        }
    }
}

impl fmt::Display for BaselineLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.variant().to_ascii_lowercase())
    }
}

impl FromStr for BaselineLevel {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "moderate" => Ok(Self::Moderate),
            "high" => Ok(Self::High),
            "privacy" => Ok(Self::Privacy),
            _ => Err(SourceError::UnknownBaseline {
                level: s.to_string(),
            }),
        }
    }
}

/// SP 800-53 Rev5 catalog and baseline downloads.
///
/// The URL template may use `{version}`, `{fmt}` and `{filename}`.
pub struct NistSp80053Source<F> {
    version: String,
    format: OscalFormat,
    base_url_template: String,
    fetcher: F,
}

impl<F: Fetch> NistSp80053Source<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            version: DEFAULT_NIST_VERSION.to_string(),
            format: OscalFormat::default(),
            base_url_template: DEFAULT_NIST_URL_TEMPLATE.to_string(),
            fetcher,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_format(mut self, format: OscalFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_base_url_template(mut self, template: impl Into<String>) -> Self {
        self.base_url_template = template.into();
        self
    }

    pub fn format(&self) -> OscalFormat {
        self.format
    }

    pub fn catalog_url(&self) -> String {
        self.build_url(CATALOG_BASENAME)
    }

    pub fn baseline_url(&self, level: BaselineLevel) -> String {
        self.build_url(&baseline_basename(level))
    }

    pub fn download_catalog(&self, dest_dir: &Path) -> Result<PathBuf, IngestError> {
        self.download(CATALOG_BASENAME, dest_dir)
    }

    pub fn download_baseline(&self, level: BaselineLevel, dest_dir: &Path) -> Result<PathBuf, IngestError> {
        self.download(&baseline_basename(level), dest_dir)
    }

    fn download(&self, basename: &str, dest_dir: &Path) -> Result<PathBuf, IngestError> {
        let url = self.build_url(basename);
        let data = self.fetcher.fetch(&url)?;
        let target = write_download(dest_dir, &self.filename(basename), &data)?;
        tracing::info!(url = %url, path = %target.display(), "downloaded OSCAL content");
        Ok(target)
    }

    fn filename(&self, basename: &str) -> String {
        format!("{basename}{}", self.format.suffix())
    }

    fn build_url(&self, basename: &str) -> String {
        self.base_url_template
            .replace("{version}", &self.version)
            .replace("{fmt}", self.format.as_str())
            .replace("{filename}", &self.filename(basename))
    }
}

fn baseline_basename(level: BaselineLevel) -> String {
    format!("NIST_SP-800-53_rev5_{}-baseline_profile", level.variant())
}
