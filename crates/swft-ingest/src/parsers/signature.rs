//! Signature verification payloads. Only well-formedness is checked.

use std::path::Path;

use swft_core::errors::{FormatError, IngestError};
use swft_core::json;
use swft_core::models::SignaturePayload;

use super::read_source;

pub fn load_signature(path: &Path) -> Result<SignaturePayload, IngestError> {
    Ok(parse_signature(&read_source(path)?)?)
}

pub fn parse_signature(bytes: &[u8]) -> Result<SignaturePayload, FormatError> {
    Ok(SignaturePayload {
        raw: json::parse_bytes(bytes)?,
    })
}
