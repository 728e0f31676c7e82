//! Stateless document parsers.
//!
//! Every parser has a pure `parse_*(&[u8])` form returning [`FormatError`]
//! and a `load_*(&Path)` form that reads the file first.

pub mod azure_policy;
pub mod cyclonedx;
pub mod oscal_catalog;
pub mod oscal_profile;
pub mod signature;
pub mod trivy;

use std::path::Path;

use serde_json::Value;
use swft_core::errors::{FileError, FormatError};

pub use azure_policy::{load_initiative, load_policy_states, parse_initiative, parse_policy_states};
pub use cyclonedx::{load_sbom, parse_sbom};
pub use oscal_catalog::{load_catalog, parse_catalog};
pub use oscal_profile::{load_profile, parse_profile};
pub use signature::{load_signature, parse_signature};
pub use trivy::{load_trivy_report, parse_trivy_report};

pub(crate) fn read_source(path: &Path) -> Result<Vec<u8>, FileError> {
    std::fs::read(path).map_err(|e| FileError::Unreadable {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// JSON type name, for shape errors.
pub(crate) fn shape_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Fail unless the document root is an object.
pub(crate) fn require_object(value: &Value, document: &str) -> Result<(), FormatError> {
    if value.is_object() {
        Ok(())
    } else {
        Err(FormatError::UnsupportedShape {
            document: document.to_string(),
            shape: shape_of(value).to_string(),
        })
    }
}
