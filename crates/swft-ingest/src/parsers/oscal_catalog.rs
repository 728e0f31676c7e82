//! OSCAL catalog parser.
//!
//! Walks top-level `controls[]`, then `groups[]` recursively. A group's
//! family is its `title`, else its `id`, else the enclosing family.
//! Sub-controls inherit their parent's family.

use std::path::Path;

use serde_json::Value;
use swft_core::errors::{FormatError, IngestError};
use swft_core::json::{self, get_array, get_str};
use swft_core::models::{CatalogControl, CatalogDocument, CatalogMetadata};

use super::read_source;

const OBJECTIVE_PART_NAMES: [&str; 3] = ["assessment-objectives", "assessment-objective", "objective"];

pub fn load_catalog(path: &Path) -> Result<CatalogDocument, IngestError> {
    Ok(parse_catalog(&read_source(path)?)?)
}

pub fn parse_catalog(bytes: &[u8]) -> Result<CatalogDocument, FormatError> {
    let data = json::parse_bytes(bytes)?;
    let catalog = json::get(&data, &["catalog"]).ok_or_else(|| FormatError::MissingTopLevel {
        document: "OSCAL catalog".to_string(),
        key: "catalog".to_string(),
    })?;

    let metadata = json::get(catalog, &["metadata"]).unwrap_or(&Value::Null);
    let meta = extract_metadata(metadata);

    let mut controls = Vec::new();
    for control in get_array(catalog, &["controls"]) {
        walk_control(control, None, &mut controls)?;
    }
    for group in get_array(catalog, &["groups"]) {
        let family = get_str(group, &["title"]).or_else(|| get_str(group, &["id"]));
        walk_group(group, family, &mut controls)?;
    }

    Ok(CatalogDocument {
        metadata: meta,
        controls,
    })
}

/// Title, version and OSCAL version of a catalog or profile metadata block.
pub(crate) fn extract_metadata(metadata: &Value) -> CatalogMetadata {
    CatalogMetadata {
        title: get_str(metadata, &["title"]).map(String::from),
        version: extract_version(metadata),
        oscal_version: get_str(metadata, &["oscal-version"]).map(String::from),
    }
}

/// `version` as a string, or an object's `text`/`value`; else a `props`
/// entry named `version`.
fn extract_version(metadata: &Value) -> Option<String> {
    match json::get(metadata, &["version"]) {
        Some(version @ Value::Object(_)) => {
            return json::first_str(version, &["text", "value"]).map(String::from);
        }
        Some(Value::String(s)) => return Some(s.clone()),
        _ => {}
    }
    get_array(metadata, &["props"])
        .iter()
        .find(|prop| get_str(prop, &["name"]) == Some("version"))
        .and_then(|prop| get_str(prop, &["value"]))
        .map(String::from)
}

fn walk_group(
    group: &Value,
    family: Option<&str>,
    out: &mut Vec<CatalogControl>,
) -> Result<(), FormatError> {
    for control in get_array(group, &["controls"]) {
        walk_control(control, family, out)?;
    }
    for subgroup in get_array(group, &["groups"]) {
        let sub_family = get_str(subgroup, &["title"])
            .or_else(|| get_str(subgroup, &["id"]))
            .or(family);
        walk_group(subgroup, sub_family, out)?;
    }
    Ok(())
}

fn walk_control(
    control: &Value,
    family: Option<&str>,
    out: &mut Vec<CatalogControl>,
) -> Result<(), FormatError> {
    let control_id = get_str(control, &["id"]).ok_or_else(|| FormatError::MissingField {
        context: "control".to_string(),
        field: "id".to_string(),
    })?;

    out.push(CatalogControl {
        control_id: control_id.to_string(),
        family: family.map(String::from),
        title: get_str(control, &["title"]).map(String::from),
        parameters: get_array(control, &["params"]).to_vec(),
        assessment_objectives: assessment_objectives(control),
    });

    for child in get_array(control, &["controls"]) {
        walk_control(child, family, out)?;
    }
    Ok(())
}

fn assessment_objectives(control: &Value) -> Vec<Value> {
    get_array(control, &["parts"])
        .iter()
        .filter(|part| is_assessment_objective(part))
        .cloned()
        .collect()
}

fn is_assessment_objective(part: &Value) -> bool {
    if get_str(part, &["name"]).is_some_and(|name| OBJECTIVE_PART_NAMES.contains(&name)) {
        return true;
    }
    if get_str(part, &["class"]) == Some("assessment") {
        return true;
    }
    get_array(part, &["props"])
        .iter()
        .any(|prop| get_str(prop, &["name"]) == Some("assessment-objective"))
}
