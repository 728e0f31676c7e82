//! OSCAL profile parser.

use std::collections::BTreeSet;
use std::path::Path;

use serde_json::Value;
use swft_core::errors::{FormatError, IngestError};
use swft_core::json::{self, get_array, get_str, has_key};
use swft_core::models::ProfileDocument;

use super::oscal_catalog::extract_metadata;
use super::read_source;

pub fn load_profile(path: &Path) -> Result<ProfileDocument, IngestError> {
    Ok(parse_profile(&read_source(path)?)?)
}

/// Control ids come from `imports[].include-controls[].with-ids[]`, falling
/// back to `controls[].id` only when the imports yield nothing. Returned
/// sorted and deduplicated.
pub fn parse_profile(bytes: &[u8]) -> Result<ProfileDocument, FormatError> {
    let data = json::parse_bytes(bytes)?;
    let profile = json::get(&data, &["profile"]).ok_or_else(|| FormatError::MissingTopLevel {
        document: "OSCAL profile".to_string(),
        key: "profile".to_string(),
    })?;

    let metadata = extract_metadata(json::get(profile, &["metadata"]).unwrap_or(&Value::Null));

    let mut ids = BTreeSet::new();
    for import in get_array(profile, &["imports"]) {
        for include in get_array(import, &["include-controls"]) {
            if has_key(include, "matching") {
                return Err(FormatError::Unsupported {
                    feature: "profile include-controls with 'matching' selectors".to_string(),
                });
            }
            ids.extend(
                get_array(include, &["with-ids"])
                    .iter()
                    .filter_map(Value::as_str)
                    .filter(|id| !id.is_empty())
                    .map(String::from),
            );
        }
    }

    if ids.is_empty() {
        ids.extend(
            get_array(profile, &["controls"])
                .iter()
                .filter_map(|control| get_str(control, &["id"]))
                .map(String::from),
        );
    }

    if ids.is_empty() {
        return Err(FormatError::Empty {
            document: "profile".to_string(),
            what: "control identifiers".to_string(),
        });
    }

    Ok(ProfileDocument {
        metadata,
        control_ids: ids.into_iter().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> Result<ProfileDocument, FormatError> {
        parse_profile(value.to_string().as_bytes())
    }

    #[test]
    fn with_ids_sorted_and_deduplicated() {
        let doc = parse(json!({
            "profile": {
                "metadata": {"title": "Moderate", "version": "1.0"},
                "imports": [
                    {"include-controls": [{"with-ids": ["ac-2", "ac-1"]}]},
                    {"include-controls": [{"with-ids": ["ac-1", "au-2"]}]}
                ]
            }
        }))
        .unwrap();
        assert_eq!(doc.control_ids, vec!["ac-1", "ac-2", "au-2"]);
        assert_eq!(doc.metadata.title.as_deref(), Some("Moderate"));
    }

    #[test]
    fn matching_selector_is_unsupported() {
        let err = parse(json!({
            "profile": {"imports": [{"include-controls": [{"matching": [{"pattern": "ac-*"}]}]}]}
        }))
        .unwrap_err();
        assert!(matches!(err, FormatError::Unsupported { .. }));
    }

    #[test]
    fn controls_fallback_only_when_imports_empty() {
        let doc = parse(json!({
            "profile": {"imports": [], "controls": [{"id": "sc-7"}, {"title": "no id"}]}
        }))
        .unwrap();
        assert_eq!(doc.control_ids, vec!["sc-7"]);

        let doc = parse(json!({
            "profile": {
                "imports": [{"include-controls": [{"with-ids": ["ac-1"]}]}],
                "controls": [{"id": "sc-7"}]
            }
        }))
        .unwrap();
        assert_eq!(doc.control_ids, vec!["ac-1"]);
    }

    #[test]
    fn empty_profile_fails() {
        assert!(matches!(
            parse(json!({"profile": {"imports": []}})),
            Err(FormatError::Empty { .. })
        ));
        assert!(matches!(
            parse(json!({"catalog": {}})),
            Err(FormatError::MissingTopLevel { .. })
        ));
    }
}
