//! Argument checks shared by operations that turn caller input into paths.

use swft_core::errors::IngestError;

/// Trimmed, non-empty, and usable as a single path segment.
pub fn path_segment<'a>(field: &str, value: &'a str) -> Result<&'a str, IngestError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(IngestError::invalid(field, "must not be empty"));
    }
    if trimmed == "." || trimmed == ".." || trimmed.contains(['/', '\\']) {
        return Err(IngestError::invalid(
            field,
            format!("'{trimmed}' must not contain path separators"),
        ));
    }
    Ok(trimmed)
}
