//! Authority-document download errors.

use super::error_code::{self, SwftErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to download {url}: {message}")]
    Download { url: String, message: String },

    #[error("unexpected status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("unsupported OSCAL format '{format}'; choose from json, yaml, xml")]
    UnsupportedFormat { format: String },

    #[error("unknown baseline '{level}'; supported values: high, low, moderate, privacy")]
    UnknownBaseline { level: String },

    #[error("URL template must include {placeholder}: {template}")]
    BadTemplate { template: String, placeholder: String },
}

impl SwftErrorCode for SourceError {
    fn error_code(&self) -> &'static str {
        error_code::SOURCE_ERROR
    }
}
