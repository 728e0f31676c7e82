//! Evidence ingestion: content-hash idempotence, child rows and run links.

use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use swft_core::config::SwftConfig;
use swft_core::errors::{IngestError, StorageError};
use swft_core::models::EvidenceKind;
use swft_ingest::{ComplianceService, ProjectInput};
use swft_storage::queries::evidence;
use swft_storage::DatabaseManager;
use tempfile::TempDir;

fn service(dir: &TempDir) -> ComplianceService {
    let svc = ComplianceService::with_database(
        SwftConfig::with_home(dir.path()),
        DatabaseManager::open_in_memory().unwrap(),
    );
    svc.create_project(&ProjectInput {
        key: "alpha",
        ..Default::default()
    })
    .unwrap();
    svc
}

fn write_json(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, value.to_string()).unwrap();
    path
}

fn sbom(components: &[(&str, &str)]) -> Value {
    let components: Vec<Value> = components
        .iter()
        .map(|(name, version)| {
            json!({
                "type": "library",
                "name": name,
                "version": version,
                "purl": format!("pkg:cargo/{name}@{version}"),
                "licenses": [{"license": {"id": "MIT"}}, "Apache-2.0"]
            })
        })
        .collect();
    json!({"bomFormat": "CycloneDX", "specVersion": "1.5", "components": components})
}

#[test]
fn sbom_ingest_counts_components() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir);
    let path = write_json(dir.path(), "sbom.json", &sbom(&[("serde", "1.0.0"), ("tokio", "1.37.0")]));

    let result = svc.ingest_sbom("alpha", "build-1", &path).unwrap();
    assert_eq!(result.derived_count, 2);
    assert_eq!(result.record.kind, EvidenceKind::Sbom);
    assert_eq!(result.record.run_id, "build-1");

    let rows = svc
        .database()
        .with_reader(|conn| evidence::sbom_components(conn, result.evidence_id))
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].licenses, "MIT, Apache-2.0");

    let run_dir = dir.path().join("store").join("evidence").join("alpha").join("build-1");
    assert!(result.record.file_path.starts_with(&run_dir));
    let file_name = result.record.file_path.file_name().unwrap().to_str().unwrap();
    assert!(file_name.starts_with("alpha-build-1-sbom-"), "{file_name}");
    assert_eq!(
        result.record.size_bytes,
        std::fs::metadata(&path).unwrap().len() as i64
    );
}

#[test]
fn identical_sbom_reingest_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir);
    let path = write_json(dir.path(), "sbom.json", &sbom(&[("serde", "1.0.0"), ("tokio", "1.37.0")]));

    let first = svc.ingest_sbom("alpha", "build-1", &path).unwrap();
    let second = svc.ingest_sbom("alpha", "build-1", &path).unwrap();
    assert_eq!(first.evidence_id, second.evidence_id);
    assert_eq!(second.derived_count, 2);

    svc.database()
        .with_reader(|conn| {
            assert_eq!(evidence::count_evidence(conn)?, 1);
            assert_eq!(evidence::sbom_components(conn, first.evidence_id)?.len(), 2);
            Ok::<_, StorageError>(())
        })
        .unwrap();
    assert_eq!(svc.evidence_for_run("alpha", "build-1").unwrap().len(), 1);
}

#[test]
fn changed_sbom_is_a_new_record() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir);
    let v1 = write_json(dir.path(), "sbom.json", &sbom(&[("serde", "1.0.0")]));
    let first = svc.ingest_sbom("alpha", "build-1", &v1).unwrap();

    let v2 = write_json(dir.path(), "sbom.json", &sbom(&[("serde", "1.0.1"), ("rand", "0.8.5")]));
    let second = svc.ingest_sbom("alpha", "build-1", &v2).unwrap();

    assert_ne!(first.evidence_id, second.evidence_id);
    assert_eq!(second.derived_count, 2);
    assert_eq!(svc.evidence_for_run("alpha", "build-1").unwrap().len(), 2);
}

#[test]
fn same_run_id_in_another_project_moves_ownership() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir);
    svc.create_project(&ProjectInput {
        key: "beta",
        ..Default::default()
    })
    .unwrap();
    let path = write_json(dir.path(), "sbom.json", &sbom(&[("serde", "1.0.0")]));

    let first = svc.ingest_sbom("alpha", "build-1", &path).unwrap();
    let second = svc.ingest_sbom("beta", "build-1", &path).unwrap();
    assert_eq!(first.evidence_id, second.evidence_id);
    assert_ne!(first.record.run_fk, second.record.run_fk);

    let (owner_fk, runs) = svc
        .database()
        .with_reader(|conn| {
            let row = evidence::find_by_hash(conn, &first.record.content_hash)?.unwrap();
            let runs = evidence::runs_for_evidence(conn, first.evidence_id)?;
            Ok::<_, StorageError>((row.run_fk, runs))
        })
        .unwrap();
    assert_eq!(owner_fk, second.record.run_fk);
    assert_eq!(runs, vec!["build-1", "build-1"]);

    assert_eq!(svc.evidence_for_run("alpha", "build-1").unwrap().len(), 1);
    assert_eq!(svc.evidence_for_run("beta", "build-1").unwrap().len(), 1);
}

#[test]
fn identical_content_under_new_run_keeps_both_links() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir);
    let path = write_json(dir.path(), "sbom.json", &sbom(&[("serde", "1.0.0")]));

    let first = svc.ingest_sbom("alpha", "build-1", &path).unwrap();
    let second = svc.ingest_sbom("alpha", "build-2", &path).unwrap();
    assert_eq!(first.evidence_id, second.evidence_id);
    assert_eq!(second.record.run_id, "build-2");

    let (owner, runs) = svc
        .database()
        .with_reader(|conn| {
            let row = evidence::find_by_hash(conn, &first.record.content_hash)?.unwrap();
            let runs = evidence::runs_for_evidence(conn, first.evidence_id)?;
            Ok::<_, StorageError>((row.run_id, runs))
        })
        .unwrap();
    assert_eq!(owner, "build-2");
    assert_eq!(runs, vec!["build-1", "build-2"]);

    let earlier = svc.evidence_for_run("alpha", "build-1").unwrap();
    assert_eq!(earlier.len(), 1);
    assert_eq!(earlier[0].run_id, "build-1");

    let run_ids: Vec<String> = svc
        .list_runs("alpha")
        .unwrap()
        .into_iter()
        .map(|run| run.run_id)
        .collect();
    assert_eq!(run_ids, vec!["build-1", "build-2"]);
}

#[test]
fn trivy_findings_take_artifact_hint() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir);
    let report = json!({
        "Results": [
            {"Target": "app:1.0 (debian 12)", "Vulnerabilities": [
                {"VulnerabilityID": "CVE-2024-1", "Severity": "HIGH", "PkgName": "libc"}
            ]},
            {"Vulnerabilities": [
                {"VulnerabilityID": "CVE-2024-2", "Severity": "LOW", "PkgName": "zlib"}
            ]}
        ]
    });
    let path = write_json(dir.path(), "trivy.json", &report);

    let result = svc
        .ingest_trivy("alpha", "build-1", &path, Some("registry/app:1.0"))
        .unwrap();
    assert_eq!(result.derived_count, 2);

    let findings = svc
        .database()
        .with_reader(|conn| evidence::trivy_findings(conn, result.evidence_id))
        .unwrap();
    assert_eq!(findings[0].artifact.as_deref(), Some("app:1.0 (debian 12)"));
    assert_eq!(findings[1].artifact.as_deref(), Some("registry/app:1.0"));
}

#[test]
fn signature_records_digest_and_outcome() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir);
    let path = write_json(dir.path(), "cosign.json", &json!([{"critical": {"type": "cosign"}}]));

    let result = svc
        .ingest_signature("alpha", "build-1", &path, "sha256:abc123", true)
        .unwrap();
    assert_eq!(result.derived_count, 1);

    let stored = svc
        .database()
        .with_reader(|conn| evidence::get_signature(conn, result.evidence_id))
        .unwrap();
    assert_eq!(stored, Some(("sha256:abc123".to_string(), true)));

    // Re-verification of the same payload updates the outcome in place.
    svc.ingest_signature("alpha", "build-1", &path, "sha256:abc123", false)
        .unwrap();
    let stored = svc
        .database()
        .with_reader(|conn| evidence::get_signature(conn, result.evidence_id))
        .unwrap();
    assert_eq!(stored, Some(("sha256:abc123".to_string(), false)));

    assert!(matches!(
        svc.ingest_signature("alpha", "build-1", &path, "  ", true),
        Err(IngestError::InvalidArgument { .. })
    ));
}

#[test]
fn raw_file_ingest_links_without_children() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir);
    let path = dir.path().join("scan.tar.gz");
    std::fs::write(&path, b"not json at all").unwrap();

    let record = svc
        .ingest_evidence_file("alpha", "build-3", EvidenceKind::Trivy, &path)
        .unwrap();
    assert!(record
        .file_path
        .to_str()
        .unwrap()
        .ends_with(".tar.gz"));
    assert_eq!(svc.evidence_for_run("alpha", "build-3").unwrap(), vec![record]);
}

#[test]
fn rejects_unknown_project_bad_run_and_bad_payload() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir);
    let path = write_json(dir.path(), "sbom.json", &sbom(&[("serde", "1.0.0")]));

    assert!(matches!(
        svc.ingest_sbom("missing", "build-1", &path),
        Err(IngestError::NotFound { .. })
    ));
    assert!(matches!(
        svc.ingest_sbom("alpha", "../escape", &path),
        Err(IngestError::InvalidArgument { .. })
    ));

    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, b"[1, 2").unwrap();
    assert!(matches!(
        svc.ingest_sbom("alpha", "build-9", &broken),
        Err(IngestError::Format(_))
    ));
    assert!(!dir.path().join("store").join("evidence").join("alpha").join("build-9").exists());

    assert!(matches!(
        svc.evidence_for_run("alpha", "never"),
        Err(IngestError::NotFound { .. })
    ));
}
