//! CycloneDX SBOM evidence.

use std::path::Path;

use swft_core::errors::IngestError;
use swft_core::models::{EvidenceKind, ProjectRecord};
use swft_storage::queries::evidence;

use super::{EvidenceIngestResult, EvidenceManager};
use crate::parsers::load_sbom;
use crate::validation::path_segment;

impl EvidenceManager<'_> {
    /// Record an SBOM and replace its component rows.
    pub fn ingest_sbom(
        &self,
        project: &ProjectRecord,
        run_id: &str,
        sbom_path: &Path,
    ) -> Result<EvidenceIngestResult, IngestError> {
        let run_id = path_segment("run_id", run_id)?;
        let components = load_sbom(sbom_path)?;
        let pinned = self.pin(project, run_id, sbom_path)?;

        let (record, derived_count) = self.db.with_transaction(|tx| {
            let record = self.record_in(tx, project, run_id, EvidenceKind::Sbom, &pinned)?;
            let written = evidence::replace_sbom_components(tx, record.id, &components)?;
            Ok::<_, IngestError>((record, written))
        })?;

        tracing::info!(
            kind = "sbom",
            project = %project.key,
            run_id,
            evidence_id = record.id,
            components = derived_count,
            "ingested evidence"
        );

        Ok(EvidenceIngestResult {
            evidence_id: record.id,
            derived_count,
            record,
        })
    }
}
