//! Malformed or unsupported input documents.

use super::error_code::{self, SwftErrorCode};

/// Errors raised by the document parsers. Not retriable without fixing the
/// input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("invalid JSON: {message}")]
    InvalidJson { message: String },

    #[error("expected {document} JSON with top-level '{key}'")]
    MissingTopLevel { document: String, key: String },

    #[error("encountered {context} without '{field}'")]
    MissingField { context: String, field: String },

    #[error("unsupported: {feature}")]
    Unsupported { feature: String },

    #[error("{document} did not yield any {what}")]
    Empty { document: String, what: String },

    #[error("unsupported {document} payload shape: {shape}")]
    UnsupportedShape { document: String, shape: String },

    #[error("control '{control_id}' has an invalid parameter: {message}")]
    InvalidParameter { control_id: String, message: String },
}

impl SwftErrorCode for FormatError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Unsupported { .. } => error_code::UNSUPPORTED_FEATURE,
            _ => error_code::FORMAT_ERROR,
        }
    }
}
