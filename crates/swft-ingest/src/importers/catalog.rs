//! OSCAL catalog import.

use std::path::{Path, PathBuf};

use serde::Serialize;
use swft_core::config::PathsConfig;
use swft_core::constants::PIN_CATEGORY_CATALOGS;
use swft_core::errors::IngestError;
use swft_core::models::{ArtifactKind, VersionRecord};
use swft_core::strings::slugify;
use swft_storage::queries::catalog;
use swft_storage::{ensure_version, DatabaseManager};

use super::{require_name, source_uri};
use crate::parsers::load_catalog;
use crate::pinning::pin_source_file;

#[derive(Debug, Clone, Serialize)]
pub struct CatalogImportResult {
    pub version: VersionRecord,
    pub control_count: usize,
    pub pinned_path: PathBuf,
}

pub struct CatalogImporter<'a> {
    db: &'a DatabaseManager,
    paths: &'a PathsConfig,
}

impl<'a> CatalogImporter<'a> {
    pub fn new(db: &'a DatabaseManager, paths: &'a PathsConfig) -> Self {
        Self { db, paths }
    }

    /// Import `path` under the registry name `name`. `pinned_name` overrides
    /// the catalog title as the pin's file stem.
    pub fn ingest(
        &self,
        path: &Path,
        name: &str,
        pinned_name: Option<&str>,
    ) -> Result<CatalogImportResult, IngestError> {
        let name = require_name("name", name)?;
        let document = load_catalog(path)?;

        let stem = slugify(
            pinned_name
                .filter(|n| !n.trim().is_empty())
                .or(document.metadata.title.as_deref()),
            name,
        );
        let pin = pin_source_file(
            path,
            &self.paths.effective_pinned().join(PIN_CATEGORY_CATALOGS),
            &stem,
        )?;
        let version_label = document.metadata.version_label(name);
        let source = source_uri(&pin);

        let version = self.db.with_transaction(|tx| {
            let version = ensure_version(
                tx,
                ArtifactKind::Catalog,
                name,
                &version_label,
                &pin.sha256,
                &source,
            )?;
            for control in &document.controls {
                catalog::upsert_control(tx, control, version.id)?;
            }
            Ok::<_, IngestError>(version)
        })?;

        tracing::info!(
            kind = "catalog",
            artifact = name,
            version_id = version.id,
            controls = document.controls.len(),
            "imported catalog"
        );

        Ok(CatalogImportResult {
            version,
            control_count: document.controls.len(),
            pinned_path: pin.path,
        })
    }
}
