//! Facade binding one configuration and one database to every operation.

use std::path::{Path, PathBuf};

use serde::Serialize;
use swft_core::config::SwftConfig;
use swft_core::errors::{FileError, IngestError};
use swft_core::models::{
    ControlParameter, EvidenceKind, EvidenceRecord, PolicyScope, ProjectRecord, RunRecord,
    VersionRecord,
};
use swft_storage::queries::version_registry;
use swft_storage::DatabaseManager;

use crate::evidence::{EvidenceIngestResult, EvidenceManager};
use crate::importers::{
    BaselineImportResult, BaselineImporter, CatalogImportResult, CatalogImporter,
    InitiativeImportResult, PolicyInitiativeImporter, PolicyStateImportResult,
    PolicyStateImporter,
};
use crate::parameters::ParameterStore;
use crate::projects::{ProjectInput, ProjectStore};
use crate::sources::{AzurePolicySetSource, BaselineLevel, Fetch, NistSp80053Source, OscalFormat};

/// Subdirectory of the home directory receiving downloaded authority documents.
const DOWNLOADS_DIR: &str = "downloads";

#[derive(Debug, Clone, Serialize)]
pub struct SyncResult {
    pub catalog: CatalogImportResult,
    pub baseline: BaselineImportResult,
}

pub struct ComplianceService {
    config: SwftConfig,
    db: DatabaseManager,
}

impl ComplianceService {
    /// Install logging, create the configured directories and open the
    /// database. An already-installed global subscriber is kept.
    pub fn new(config: SwftConfig) -> Result<Self, IngestError> {
        swft_core::tracing::init_tracing(&config.logging);
        config.paths.ensure()?;
        let db_path = config.effective_db_path();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| FileError::CreateDir {
                path: parent.to_path_buf(),
                message: e.to_string(),
            })?;
        }
        let db = DatabaseManager::open(&db_path, &config.database)?;
        tracing::info!(db = %db_path.display(), "compliance service ready");
        Ok(Self { config, db })
    }

    /// Use an already-open database, e.g. an in-memory one.
    pub fn with_database(config: SwftConfig, db: DatabaseManager) -> Self {
        Self { config, db }
    }

    pub fn config(&self) -> &SwftConfig {
        &self.config
    }

    pub fn database(&self) -> &DatabaseManager {
        &self.db
    }

    /// Truncate the write-ahead log. A no-op for in-memory databases.
    pub fn checkpoint(&self) -> Result<bool, IngestError> {
        if self.db.path().is_none() {
            return Ok(true);
        }
        let complete = self.db.checkpoint()?;
        if !complete {
            tracing::warn!("WAL checkpoint blocked by an active connection");
        }
        Ok(complete)
    }

    // Authority documents.

    pub fn import_catalog(
        &self,
        path: &Path,
        name: &str,
        pinned_name: Option<&str>,
    ) -> Result<CatalogImportResult, IngestError> {
        CatalogImporter::new(&self.db, &self.config.paths).ingest(path, name, pinned_name)
    }

    pub fn import_baseline(
        &self,
        path: &Path,
        profile_name: &str,
        pinned_name: Option<&str>,
    ) -> Result<BaselineImportResult, IngestError> {
        BaselineImporter::new(&self.db, &self.config.paths).ingest(path, profile_name, pinned_name)
    }

    /// Import the catalog, then the baseline profile drawn from it.
    pub fn sync_catalog(
        &self,
        catalog_path: &Path,
        catalog_name: &str,
        baseline_path: &Path,
        baseline_name: &str,
    ) -> Result<SyncResult, IngestError> {
        let catalog = self.import_catalog(catalog_path, catalog_name, None)?;
        let baseline = self.import_baseline(baseline_path, baseline_name, None)?;
        Ok(SyncResult { catalog, baseline })
    }

    /// Download the SP 800-53 catalog and one baseline, then sync them.
    /// Only JSON content can be imported.
    pub fn sync_nist<F: Fetch>(
        &self,
        source: &NistSp80053Source<F>,
        level: BaselineLevel,
        catalog_name: &str,
        baseline_name: &str,
    ) -> Result<SyncResult, IngestError> {
        if source.format() != OscalFormat::Json {
            return Err(IngestError::invalid(
                "format",
                format!("only json OSCAL content can be imported, got {}", source.format().as_str()),
            ));
        }
        let dest = self.downloads_dir();
        let catalog_path = source.download_catalog(&dest)?;
        let baseline_path = source.download_baseline(level, &dest)?;
        self.sync_catalog(&catalog_path, catalog_name, &baseline_path, baseline_name)
    }

    pub fn import_policy_initiative(
        &self,
        path: &Path,
        name: &str,
        scope: &str,
    ) -> Result<InitiativeImportResult, IngestError> {
        let scope = parse_scope(scope)?;
        PolicyInitiativeImporter::new(&self.db, &self.config.paths).ingest(path, name, scope)
    }

    /// Download a built-in policy set definition and import it as `name`.
    pub fn import_builtin_policy<F: Fetch>(
        &self,
        source: &AzurePolicySetSource<F>,
        filename: &str,
        name: &str,
        scope: &str,
    ) -> Result<InitiativeImportResult, IngestError> {
        let scope = parse_scope(scope)?;
        let path = source.download(filename, &self.downloads_dir())?;
        PolicyInitiativeImporter::new(&self.db, &self.config.paths).ingest(&path, name, scope)
    }

    pub fn import_policy_states(
        &self,
        path: &Path,
        initiative: &str,
        scope: &str,
    ) -> Result<PolicyStateImportResult, IngestError> {
        let scope = parse_scope(scope)?;
        PolicyStateImporter::new(&self.db).ingest(path, initiative, scope)
    }

    pub fn list_versions(&self, kind: Option<&str>) -> Result<Vec<VersionRecord>, IngestError> {
        self.db
            .with_reader(|conn| Ok(version_registry::list(conn, kind)?))
    }

    // Projects and parameters.

    pub fn create_project(&self, input: &ProjectInput<'_>) -> Result<ProjectRecord, IngestError> {
        self.projects().create_project(input)
    }

    pub fn upsert_project(&self, input: &ProjectInput<'_>) -> Result<ProjectRecord, IngestError> {
        self.projects().upsert_project(input)
    }

    pub fn get_project(&self, project_key: &str) -> Result<ProjectRecord, IngestError> {
        self.projects().get_project(project_key)
    }

    pub fn list_projects(&self) -> Result<Vec<ProjectRecord>, IngestError> {
        self.projects().list_projects()
    }

    pub fn list_parameters(
        &self,
        control_id: &str,
        project_key: Option<&str>,
    ) -> Result<Vec<ControlParameter>, IngestError> {
        let project = project_key.map(|key| self.get_project(key)).transpose()?;
        ParameterStore::new(&self.db).list_parameters(control_id, project.as_ref())
    }

    pub fn set_parameter(
        &self,
        project_key: &str,
        control_id: &str,
        param_id: &str,
        value: &str,
    ) -> Result<ControlParameter, IngestError> {
        let project = self.get_project(project_key)?;
        ParameterStore::new(&self.db).set_parameter(&project, control_id, param_id, value)
    }

    // Evidence.

    pub fn ingest_evidence_file(
        &self,
        project_key: &str,
        run_id: &str,
        kind: EvidenceKind,
        path: &Path,
    ) -> Result<EvidenceRecord, IngestError> {
        let project = self.get_project(project_key)?;
        self.evidence().ingest_file(&project, run_id, kind, path)
    }

    pub fn ingest_sbom(
        &self,
        project_key: &str,
        run_id: &str,
        sbom_path: &Path,
    ) -> Result<EvidenceIngestResult, IngestError> {
        let project = self.get_project(project_key)?;
        self.evidence().ingest_sbom(&project, run_id, sbom_path)
    }

    pub fn ingest_trivy(
        &self,
        project_key: &str,
        run_id: &str,
        report_path: &Path,
        artifact_hint: Option<&str>,
    ) -> Result<EvidenceIngestResult, IngestError> {
        let project = self.get_project(project_key)?;
        self.evidence()
            .ingest_trivy(&project, run_id, report_path, artifact_hint)
    }

    pub fn ingest_signature(
        &self,
        project_key: &str,
        run_id: &str,
        signature_path: &Path,
        digest: &str,
        verified: bool,
    ) -> Result<EvidenceIngestResult, IngestError> {
        let project = self.get_project(project_key)?;
        self.evidence()
            .ingest_signature(&project, run_id, signature_path, digest, verified)
    }

    pub fn list_runs(&self, project_key: &str) -> Result<Vec<RunRecord>, IngestError> {
        let project = self.get_project(project_key)?;
        self.evidence().list_runs(&project)
    }

    pub fn evidence_for_run(
        &self,
        project_key: &str,
        run_id: &str,
    ) -> Result<Vec<EvidenceRecord>, IngestError> {
        let project = self.get_project(project_key)?;
        self.evidence().evidence_for_run(&project, run_id)
    }

    fn projects(&self) -> ProjectStore<'_> {
        ProjectStore::new(&self.db)
    }

    fn evidence(&self) -> EvidenceManager<'_> {
        EvidenceManager::new(&self.db, &self.config.paths)
    }

    fn downloads_dir(&self) -> PathBuf {
        self.config.paths.effective_home().join(DOWNLOADS_DIR)
    }
}

fn parse_scope(scope: &str) -> Result<PolicyScope, IngestError> {
    scope
        .trim()
        .parse()
        .map_err(|message: String| IngestError::invalid("scope", message))
}
