//! Azure Policy initiative import.

use std::path::{Path, PathBuf};

use serde::Serialize;
use swft_core::config::PathsConfig;
use swft_core::constants::PIN_CATEGORY_POLICY_INITIATIVES;
use swft_core::errors::IngestError;
use swft_core::models::{ArtifactKind, PolicyScope, VersionRecord};
use swft_core::strings::slugify;
use swft_storage::queries::policies;
use swft_storage::{ensure_version, DatabaseManager};

use super::{require_name, source_uri};
use crate::parsers::load_initiative;
use crate::pinning::pin_source_file;

#[derive(Debug, Clone, Serialize)]
pub struct InitiativeImportResult {
    pub version: VersionRecord,
    /// Row id of the `(initiative, scope)` record.
    pub initiative_id: i64,
    pub policy_count: usize,
    /// Mapping rows written; duplicate control ids within a policy count once.
    pub mapping_count: usize,
    pub pinned_path: PathBuf,
}

pub struct PolicyInitiativeImporter<'a> {
    db: &'a DatabaseManager,
    paths: &'a PathsConfig,
}

impl<'a> PolicyInitiativeImporter<'a> {
    pub fn new(db: &'a DatabaseManager, paths: &'a PathsConfig) -> Self {
        Self { db, paths }
    }

    pub fn ingest(
        &self,
        path: &Path,
        name: &str,
        scope: PolicyScope,
    ) -> Result<InitiativeImportResult, IngestError> {
        let name = require_name("name", name)?;
        let document = load_initiative(path)?;

        let pin = pin_source_file(
            path,
            &self
                .paths
                .effective_pinned()
                .join(PIN_CATEGORY_POLICY_INITIATIVES),
            &slugify(Some(name), name),
        )?;
        let version_label = document.version.clone().unwrap_or_else(|| name.to_string());
        let source = source_uri(&pin);

        let (version, initiative_fk, mapping_count) = self.db.with_transaction(|tx| {
            let version = ensure_version(
                tx,
                ArtifactKind::PolicyInitiative,
                name,
                &version_label,
                &pin.sha256,
                &source,
            )?;
            let initiative_fk = policies::upsert_initiative(tx, name, scope.as_str(), version.id)?;

            policies::delete_mappings(tx, initiative_fk)?;
            let mut mapping_count = 0;
            for policy in &document.policies {
                policies::upsert_definition(
                    tx,
                    &policy.policy_definition_id,
                    policy.display_name.as_deref(),
                    policy.category.as_deref(),
                )?;
                for control_id in &policy.control_ids {
                    if policies::insert_mapping(
                        tx,
                        initiative_fk,
                        control_id,
                        &policy.policy_definition_id,
                    )? {
                        mapping_count += 1;
                    }
                }
            }
            Ok::<_, IngestError>((version, initiative_fk, mapping_count))
        })?;

        tracing::info!(
            kind = "policy_initiative",
            artifact = name,
            scope = %scope,
            version_id = version.id,
            policies = document.policies.len(),
            mappings = mapping_count,
            "imported policy initiative"
        );

        Ok(InitiativeImportResult {
            version,
            initiative_id: initiative_fk,
            policy_count: document.policies.len(),
            mapping_count,
            pinned_path: pin.path,
        })
    }
}
