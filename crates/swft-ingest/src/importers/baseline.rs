//! OSCAL profile (baseline) import.

use std::path::{Path, PathBuf};

use serde::Serialize;
use swft_core::config::PathsConfig;
use swft_core::constants::PIN_CATEGORY_BASELINES;
use swft_core::errors::IngestError;
use swft_core::models::{ArtifactKind, VersionRecord};
use swft_core::strings::slugify;
use swft_storage::queries::baselines;
use swft_storage::{ensure_version, DatabaseManager};

use super::{require_name, source_uri};
use crate::parsers::load_profile;
use crate::pinning::pin_source_file;

#[derive(Debug, Clone, Serialize)]
pub struct BaselineImportResult {
    pub version: VersionRecord,
    pub control_count: usize,
    pub pinned_path: PathBuf,
}

pub struct BaselineImporter<'a> {
    db: &'a DatabaseManager,
    paths: &'a PathsConfig,
}

impl<'a> BaselineImporter<'a> {
    pub fn new(db: &'a DatabaseManager, paths: &'a PathsConfig) -> Self {
        Self { db, paths }
    }

    /// Import a profile as `profile_name`, replacing its control membership.
    pub fn ingest(
        &self,
        path: &Path,
        profile_name: &str,
        pinned_name: Option<&str>,
    ) -> Result<BaselineImportResult, IngestError> {
        let profile_name = require_name("profile_name", profile_name)?;
        let document = load_profile(path)?;

        let stem = slugify(
            Some(pinned_name.filter(|n| !n.trim().is_empty()).unwrap_or(profile_name)),
            profile_name,
        );
        let pin = pin_source_file(
            path,
            &self.paths.effective_pinned().join(PIN_CATEGORY_BASELINES),
            &stem,
        )?;
        let version_label = document.metadata.version_label(profile_name);
        let source = source_uri(&pin);

        let version = self.db.with_transaction(|tx| {
            let version = ensure_version(
                tx,
                ArtifactKind::Baseline,
                profile_name,
                &version_label,
                &pin.sha256,
                &source,
            )?;
            let profile_id = baselines::upsert_profile(tx, profile_name, version.id)?;
            baselines::replace_controls(tx, profile_id, &document.control_ids)?;
            Ok::<_, IngestError>(version)
        })?;

        tracing::info!(
            kind = "baseline",
            artifact = profile_name,
            version_id = version.id,
            controls = document.control_ids.len(),
            "imported baseline"
        );

        Ok(BaselineImportResult {
            version,
            control_count: document.control_ids.len(),
            pinned_path: pin.path,
        })
    }
}
