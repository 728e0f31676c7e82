//! Azure Policy initiative and policy-state parsers.

use std::path::Path;

use serde_json::Value;
use swft_core::errors::{FormatError, IngestError};
use swft_core::json::{self, first_str, get_array, get_str};
use swft_core::models::{InitiativeDocument, InitiativePolicy, PolicyStateEntry};

use super::{read_source, shape_of};

const DEFINITION_ALIASES: [&str; 2] = ["policyDefinitionId", "policyDefinition"];
const ASSIGNMENT_ALIASES: [&str; 1] = ["policyAssignmentId"];
const RESOURCE_ALIASES: [&str; 2] = ["resourceId", "resourceUri"];
const STATE_ALIASES: [&str; 2] = ["complianceState", "state"];
const TIMESTAMP_ALIASES: [&str; 3] = ["timestamp", "lastEvaluatedOn", "evaluatedTime"];

pub fn load_initiative(path: &Path) -> Result<InitiativeDocument, IngestError> {
    Ok(parse_initiative(&read_source(path)?)?)
}

pub fn load_policy_states(path: &Path) -> Result<Vec<PolicyStateEntry>, IngestError> {
    Ok(parse_policy_states(&read_source(path)?)?)
}

/// Entries without a `policyDefinitionId` are skipped.
pub fn parse_initiative(bytes: &[u8]) -> Result<InitiativeDocument, FormatError> {
    let data = json::parse_bytes(bytes)?;
    let definitions = json::get(&data, &["properties", "policyDefinitions"])
        .and_then(Value::as_array)
        .ok_or_else(|| FormatError::MissingTopLevel {
            document: "Azure Policy initiative".to_string(),
            key: "properties.policyDefinitions".to_string(),
        })?;

    let version = get_str(&data, &["properties", "metadata", "version"])
        .or_else(|| get_str(&data, &["properties", "version"]))
        .map(String::from);
    let initiative_category = get_str(&data, &["properties", "metadata", "category"])
        .or_else(|| get_str(&data, &["properties", "category"]));

    let policies = definitions
        .iter()
        .filter_map(|entry| {
            let definition_id = get_str(entry, &["policyDefinitionId"])?;
            let reference_id = get_str(entry, &["policyDefinitionReferenceId"]);
            Some(InitiativePolicy {
                policy_definition_id: definition_id.to_string(),
                reference_id: reference_id.map(String::from),
                display_name: get_str(entry, &["displayName"]).or(reference_id).map(String::from),
                category: get_str(entry, &["metadata", "category"])
                    .or(initiative_category)
                    .map(String::from),
                control_ids: control_ids(entry),
            })
        })
        .collect();

    Ok(InitiativeDocument {
        name: get_str(&data, &["name"])
            .or_else(|| get_str(&data, &["properties", "displayName"]))
            .map(String::from),
        version,
        policies,
    })
}

/// `complianceControlIds`, else `nistControlIds`; upper-cased and trimmed.
fn control_ids(entry: &Value) -> Vec<String> {
    let mut ids = get_array(entry, &["metadata", "compliance", "complianceControlIds"]);
    if ids.is_empty() {
        ids = get_array(entry, &["metadata", "nistControlIds"]);
    }
    ids.iter()
        .filter_map(Value::as_str)
        .map(|id| id.trim().to_uppercase())
        .filter(|id| !id.is_empty())
        .collect()
}

/// Accepts a bare array, or an object carrying a `value`/`states` array.
/// Entries missing any of the five required fields are dropped.
pub fn parse_policy_states(bytes: &[u8]) -> Result<Vec<PolicyStateEntry>, FormatError> {
    let data = json::parse_bytes(bytes)?;
    let entries: &[Value] = match &data {
        Value::Array(entries) => entries,
        Value::Object(_) => {
            let value = get_array(&data, &["value"]);
            if value.is_empty() {
                get_array(&data, &["states"])
            } else {
                value
            }
        }
        other => {
            return Err(FormatError::UnsupportedShape {
                document: "policy state".to_string(),
                shape: shape_of(other).to_string(),
            })
        }
    };

    Ok(entries.iter().filter_map(state_entry).collect())
}

fn state_entry(entry: &Value) -> Option<PolicyStateEntry> {
    Some(PolicyStateEntry {
        policy_definition_id: first_str(entry, &DEFINITION_ALIASES)?.to_string(),
        policy_assignment_id: first_str(entry, &ASSIGNMENT_ALIASES)?.to_string(),
        resource_id: first_str(entry, &RESOURCE_ALIASES)?.to_string(),
        compliance_state: first_str(entry, &STATE_ALIASES)?.to_string(),
        last_evaluated: first_str(entry, &TIMESTAMP_ALIASES)?.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn initiative_fields_and_category_fallbacks() {
        let doc = parse_initiative(
            json!({
                "name": "fedramp-moderate",
                "properties": {
                    "displayName": "FedRAMP Moderate",
                    "metadata": {"version": "1.2.0", "category": "Regulatory Compliance"},
                    "policyDefinitions": [
                        {
                            "policyDefinitionId": "/providers/def/1",
                            "policyDefinitionReferenceId": "ref-1",
                            "metadata": {"compliance": {"complianceControlIds": [" ac-2 ", 5, "au-6"]}}
                        },
                        {
                            "policyDefinitionId": "/providers/def/2",
                            "displayName": "Second",
                            "metadata": {"category": "Own", "nistControlIds": ["sc-7"]}
                        },
                        {"displayName": "no id"}
                    ]
                }
            })
            .to_string()
            .as_bytes(),
        )
        .unwrap();

        assert_eq!(doc.name.as_deref(), Some("fedramp-moderate"));
        assert_eq!(doc.version.as_deref(), Some("1.2.0"));
        assert_eq!(doc.policies.len(), 2);

        let first = &doc.policies[0];
        assert_eq!(first.display_name.as_deref(), Some("ref-1"));
        assert_eq!(first.category.as_deref(), Some("Regulatory Compliance"));
        assert_eq!(first.control_ids, vec!["AC-2", "AU-6"]);

        let second = &doc.policies[1];
        assert_eq!(second.category.as_deref(), Some("Own"));
        assert_eq!(second.control_ids, vec!["SC-7"]);
    }

    #[test]
    fn initiative_requires_policy_definitions() {
        assert!(matches!(
            parse_initiative(br#"{"properties": {}}"#),
            Err(FormatError::MissingTopLevel { .. })
        ));
    }

    #[test]
    fn states_accept_array_and_envelopes() {
        let entry = json!({
            "policyDefinition": "/def/1",
            "policyAssignmentId": "/assign/1",
            "resourceUri": "/res/1",
            "state": "NonCompliant",
            "evaluatedTime": "2024-05-01T00:00:00Z"
        });
        assert_eq!(parse_policy_states(json!([entry]).to_string().as_bytes()).unwrap().len(), 1);
        assert_eq!(
            parse_policy_states(json!({"states": [entry]}).to_string().as_bytes()).unwrap().len(),
            1
        );
        assert!(parse_policy_states(br#"{"other": []}"#).unwrap().is_empty());
        assert!(matches!(
            parse_policy_states(b"\"nope\""),
            Err(FormatError::UnsupportedShape { .. })
        ));
    }

    #[test]
    fn partial_states_are_dropped() {
        let states = parse_policy_states(
            json!({"value": [
                {"policyDefinitionId": "/def/1", "policyAssignmentId": "/a", "resourceId": "/r",
                 "complianceState": "Compliant", "timestamp": "2024-05-01T00:00:00Z"},
                {"policyDefinitionId": "/def/2", "policyAssignmentId": "/a", "resourceId": "/r",
                 "complianceState": "Compliant"}
            ]})
            .to_string()
            .as_bytes(),
        )
        .unwrap();
        assert_eq!(states.len(), 1);
        assert_eq!(states[0].policy_definition_id, "/def/1");
    }
}
