//! Policy initiative and policy state import.

use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use swft_core::config::SwftConfig;
use swft_core::errors::{IngestError, StorageError};
use swft_ingest::ComplianceService;
use swft_storage::queries::policies;
use swft_storage::DatabaseManager;
use tempfile::TempDir;

fn service(dir: &TempDir) -> ComplianceService {
    ComplianceService::with_database(
        SwftConfig::with_home(dir.path()),
        DatabaseManager::open_in_memory().unwrap(),
    )
}

fn write_json(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, value.to_string()).unwrap();
    path
}

fn initiative() -> Value {
    json!({
        "name": "fedramp-moderate",
        "properties": {
            "displayName": "FedRAMP Moderate",
            "metadata": {"version": "2.0.0", "category": "Regulatory Compliance"},
            "policyDefinitions": [
                {
                    "policyDefinitionId": "/providers/def/audit-vm",
                    "policyDefinitionReferenceId": "audit-vm",
                    "metadata": {"compliance": {"complianceControlIds": ["ac-2", "AU-6", "ac-2"]}}
                },
                {
                    "policyDefinitionId": "/providers/def/unmapped",
                    "displayName": "Unmapped"
                }
            ]
        }
    })
}

fn state(definition: &str, resource: &str, compliance: &str) -> Value {
    json!({
        "policyDefinitionId": definition,
        "policyAssignmentId": "/assignments/fedramp",
        "resourceId": resource,
        "complianceState": compliance,
        "timestamp": "2024-05-01T12:00:00+00:00"
    })
}

fn initiative_fk(svc: &ComplianceService, scope: &str) -> i64 {
    svc.database()
        .with_reader(|conn| policies::find_initiative(conn, "fedramp-moderate", scope))
        .unwrap()
        .unwrap()
}

#[test]
fn initiative_import_counts_policies_and_mappings() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir);
    let path = write_json(dir.path(), "initiative.json", &initiative());

    let result = svc
        .import_policy_initiative(&path, "fedramp-moderate", "Commercial")
        .unwrap();
    assert_eq!(result.policy_count, 2);
    assert_eq!(result.mapping_count, 2);
    assert_eq!(result.version.kind, "policy_initiative");
    assert_eq!(result.version.version_label, "2.0.0");
    assert_eq!(result.initiative_id, initiative_fk(&svc, "commercial"));

    let (display_name, category) = svc
        .database()
        .with_reader(|conn| policies::get_definition(conn, "/providers/def/audit-vm"))
        .unwrap()
        .unwrap();
    assert_eq!(display_name.as_deref(), Some("audit-vm"));
    assert_eq!(category.as_deref(), Some("Regulatory Compliance"));
}

#[test]
fn scopes_are_separate_initiatives() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir);
    let path = write_json(dir.path(), "initiative.json", &initiative());

    let commercial = svc
        .import_policy_initiative(&path, "fedramp-moderate", "commercial")
        .unwrap();
    let gov = svc
        .import_policy_initiative(&path, "fedramp-moderate", "gov")
        .unwrap();

    // One registry entry, two scoped initiative rows.
    assert_eq!(commercial.version.id, gov.version.id);
    assert_ne!(commercial.initiative_id, gov.initiative_id);

    let mappings = svc
        .database()
        .with_reader(|conn| policies::count_mappings(conn, gov.initiative_id))
        .unwrap();
    assert_eq!(mappings, 2);
}

#[test]
fn invalid_scope_is_rejected_before_any_write() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir);
    let path = write_json(dir.path(), "initiative.json", &initiative());

    let err = svc
        .import_policy_initiative(&path, "fedramp-moderate", "azure-china")
        .unwrap_err();
    assert!(matches!(err, IngestError::InvalidArgument { .. }));
    assert!(!dir.path().join("pinned").exists());
}

#[test]
fn states_require_imported_initiative() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir);
    let path = write_json(dir.path(), "states.json", &json!([]));

    let err = svc
        .import_policy_states(&path, "fedramp-moderate", "commercial")
        .unwrap_err();
    assert!(matches!(err, IngestError::NotFound { .. }));
    assert!(err.to_string().contains("Import the policy definitions first"));
}

#[test]
fn unmapped_states_are_processed_but_not_inserted() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir);
    let init = write_json(dir.path(), "initiative.json", &initiative());
    svc.import_policy_initiative(&init, "fedramp-moderate", "commercial")
        .unwrap();

    let states = write_json(
        dir.path(),
        "states.json",
        &json!({"value": [state("/providers/def/unmapped", "/vm/1", "NonCompliant")]}),
    );
    let result = svc
        .import_policy_states(&states, "fedramp-moderate", "commercial")
        .unwrap();
    assert_eq!(result.processed, 1);
    assert_eq!(result.inserted, 0);
}

#[test]
fn states_fan_out_and_replace_on_reobservation() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir);
    let init = write_json(dir.path(), "initiative.json", &initiative());
    svc.import_policy_initiative(&init, "fedramp-moderate", "commercial")
        .unwrap();
    let fk = initiative_fk(&svc, "commercial");

    let first = write_json(
        dir.path(),
        "states-1.json",
        &json!({"value": [
            state("/providers/def/audit-vm", "/vm/1", "NonCompliant"),
            state("/providers/def/unmapped", "/vm/1", "Compliant"),
            {"policyDefinitionId": "/providers/def/audit-vm"}
        ]}),
    );
    let result = svc
        .import_policy_states(&first, "fedramp-moderate", "commercial")
        .unwrap();
    // The partial third entry is dropped by the parser.
    assert_eq!(result.processed, 2);
    assert_eq!(result.inserted, 2);

    let second = write_json(
        dir.path(),
        "states-2.json",
        &json!([state("/providers/def/audit-vm", "/vm/1", "Compliant")]),
    );
    svc.import_policy_states(&second, "fedramp-moderate", "commercial")
        .unwrap();

    let rows = svc
        .database()
        .with_reader(|conn| policies::states_for_initiative(conn, fk))
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row.compliance_state == "Compliant"));
    assert_eq!(
        rows.iter().map(|row| row.control_id.as_str()).collect::<Vec<_>>(),
        vec!["AC-2", "AU-6"]
    );
    assert_eq!(rows[0].last_evaluated, "2024-05-01T12:00:00Z");
}

#[test]
fn initiative_reimport_replaces_mappings() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir);
    let path = write_json(dir.path(), "initiative.json", &initiative());

    let first = svc
        .import_policy_initiative(&path, "fedramp-moderate", "gov")
        .unwrap();
    let again = svc
        .import_policy_initiative(&path, "fedramp-moderate", "gov")
        .unwrap();
    assert_eq!(first.initiative_id, again.initiative_id);
    assert_eq!(again.mapping_count, 2);

    svc.database()
        .with_reader(|conn| {
            assert_eq!(policies::count_mappings(conn, first.initiative_id)?, 2);
            assert_eq!(
                policies::controls_for_policy(conn, first.initiative_id, "/providers/def/audit-vm")?,
                vec!["AC-2", "AU-6"]
            );
            Ok::<_, StorageError>(())
        })
        .unwrap();
}
