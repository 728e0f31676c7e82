//! CycloneDX SBOM parser.

use std::path::Path;

use serde_json::Value;
use swft_core::errors::{FormatError, IngestError};
use swft_core::json::{self, first_str, get, get_array, get_str};
use swft_core::models::SbomComponent;

use super::{read_source, require_object};

pub fn load_sbom(path: &Path) -> Result<Vec<SbomComponent>, IngestError> {
    Ok(parse_sbom(&read_source(path)?)?)
}

pub fn parse_sbom(bytes: &[u8]) -> Result<Vec<SbomComponent>, FormatError> {
    let data = json::parse_bytes(bytes)?;
    require_object(&data, "CycloneDX SBOM")?;

    Ok(get_array(&data, &["components"])
        .iter()
        .filter(|component| component.is_object())
        .map(|component| SbomComponent {
            name: get_str(component, &["name"]).unwrap_or_default().to_string(),
            version: get_str(component, &["version"]).map(String::from),
            purl: get_str(component, &["purl"]).map(String::from),
            licenses: get_array(component, &["licenses"])
                .iter()
                .filter_map(license_of)
                .map(String::from)
                .collect(),
        })
        .collect())
}

/// `"MIT"`, `{"license": "MIT"}` or `{"license": {"id"|"name"|"text": ..}}`.
fn license_of(entry: &Value) -> Option<&str> {
    match entry {
        Value::String(s) if !s.is_empty() => Some(s.as_str()),
        Value::Object(_) => match get(entry, &["license"])? {
            Value::String(s) if !s.is_empty() => Some(s.as_str()),
            license @ Value::Object(_) => first_str(license, &["id", "name", "text"]),
            _ => None,
        },
        _ => None,
    }
}
