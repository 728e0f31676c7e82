//! Project store and control parameter values.

use serde_json::json;
use swft_core::config::SwftConfig;
use swft_core::errors::IngestError;
use swft_ingest::{ComplianceService, ProjectInput};
use swft_storage::queries::parameters;
use swft_storage::DatabaseManager;
use tempfile::TempDir;

fn service(dir: &TempDir) -> ComplianceService {
    ComplianceService::with_database(
        SwftConfig::with_home(dir.path()),
        DatabaseManager::open_in_memory().unwrap(),
    )
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn import_catalog(svc: &ComplianceService, dir: &TempDir) {
    let catalog = json!({
        "catalog": {
            "metadata": {"title": "Catalog", "version": "1"},
            "groups": [{"title": "Access Control", "controls": [
                {
                    "id": "ac-1",
                    "params": [
                        {"id": "ac-01_odp.01", "label": "personnel", "guidance": "who receives policy"},
                        {"param-id": "ac-01_odp.02", "values": ["annually"]}
                    ]
                },
                {"id": "ac-2"}
            ]}]
        }
    });
    let path = dir.path().join("catalog.json");
    std::fs::write(&path, catalog.to_string()).unwrap();
    svc.import_catalog(&path, "catalog", None).unwrap();
}

#[test]
fn create_normalizes_and_rejects_duplicates() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir);
    let services = strings(&[" vm ", "", "storage", "vm"]);
    let regions = strings(&["eastus", "  "]);

    let record = svc
        .create_project(&ProjectInput {
            key: " alpha ",
            services: &services,
            regions: &regions,
            boundary_description: Some("   "),
        })
        .unwrap();
    assert_eq!(record.key, "alpha");
    assert_eq!(record.services, strings(&["vm", "storage"]));
    assert_eq!(record.regions, strings(&["eastus"]));
    assert!(record.boundary_description.is_none());

    let err = svc
        .create_project(&ProjectInput {
            key: "alpha",
            ..Default::default()
        })
        .unwrap_err();
    assert!(matches!(err, IngestError::AlreadyExists { .. }));
    assert_eq!(err.to_string(), "project 'alpha' already exists");
}

#[test]
fn upsert_replaces_collections_together() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir);
    let first = strings(&["vm", "storage"]);
    let second = strings(&["aks"]);

    let created = svc
        .upsert_project(&ProjectInput {
            key: "alpha",
            services: &first,
            regions: &first,
            boundary_description: Some("prod subscription"),
        })
        .unwrap();
    let updated = svc
        .upsert_project(&ProjectInput {
            key: "alpha",
            services: &second,
            regions: &[],
            boundary_description: None,
        })
        .unwrap();

    assert_eq!(created.id, updated.id);
    assert_eq!(updated.services, second);
    assert!(updated.regions.is_empty());
    assert!(updated.boundary_description.is_none());
    assert_eq!(svc.get_project("alpha").unwrap(), updated);
}

#[test]
fn get_and_list_projects() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir);
    for key in ["zeta", "alpha", "mid"] {
        svc.create_project(&ProjectInput {
            key,
            ..Default::default()
        })
        .unwrap();
    }

    let keys: Vec<String> = svc
        .list_projects()
        .unwrap()
        .into_iter()
        .map(|p| p.key)
        .collect();
    assert_eq!(keys, strings(&["alpha", "mid", "zeta"]));

    let err = svc.get_project("nope").unwrap_err();
    assert!(matches!(err, IngestError::NotFound { .. }));
    assert_eq!(err.public_message(), "project 'nope' not found");
}

#[test]
fn project_key_must_be_a_path_segment() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir);
    assert!(matches!(
        svc.create_project(&ProjectInput {
            key: "a/b",
            ..Default::default()
        }),
        Err(IngestError::InvalidArgument { .. })
    ));
}

#[test]
fn list_parameters_normalizes_catalog_params() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir);
    import_catalog(&svc, &dir);

    let params = svc.list_parameters("ac-1", None).unwrap();
    assert_eq!(params.len(), 2);
    assert_eq!(params[0].param_id, "ac-01_odp.01");
    assert_eq!(params[0].description.as_deref(), Some("who receives policy"));
    assert_eq!(params[1].param_id, "ac-01_odp.02");
    assert_eq!(params[1].values, strings(&["annually"]));
    assert!(params.iter().all(|p| p.current_value.is_none()));

    assert!(svc.list_parameters("ac-2", None).unwrap().is_empty());

    let err = svc.list_parameters("zz-1", None).unwrap_err();
    assert_eq!(
        err.to_string(),
        "control 'zz-1' not found. Import the catalog first."
    );
}

#[test]
fn set_parameter_stores_value_and_placeholder() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir);
    import_catalog(&svc, &dir);
    let project = svc
        .create_project(&ProjectInput {
            key: "alpha",
            ..Default::default()
        })
        .unwrap();

    let param = svc
        .set_parameter("alpha", "ac-1", "ac-01_odp.01", "security team")
        .unwrap();
    assert_eq!(param.current_value.as_deref(), Some("security team"));

    svc.set_parameter("alpha", "ac-1", "ac-01_odp.01", "ciso")
        .unwrap();
    let params = svc.list_parameters("ac-1", Some("alpha")).unwrap();
    assert_eq!(params[0].current_value.as_deref(), Some("ciso"));
    assert!(params[1].current_value.is_none());

    let requirement = svc
        .database()
        .with_reader(|conn| parameters::get_implemented_requirement(conn, project.id, "ac-1"))
        .unwrap();
    assert_eq!(
        requirement,
        Some(("Customer".to_string(), "Partial".to_string()))
    );
}

#[test]
fn set_parameter_requires_project_control_and_param() {
    let dir = TempDir::new().unwrap();
    let svc = service(&dir);
    import_catalog(&svc, &dir);
    svc.create_project(&ProjectInput {
        key: "alpha",
        ..Default::default()
    })
    .unwrap();

    for (project, control, param) in [
        ("ghost", "ac-1", "ac-01_odp.01"),
        ("alpha", "zz-1", "ac-01_odp.01"),
        ("alpha", "ac-1", "ac-01_odp.99"),
    ] {
        assert!(
            matches!(
                svc.set_parameter(project, control, param, "x"),
                Err(IngestError::NotFound { .. })
            ),
            "{project}/{control}/{param}"
        );
    }
}
