//! Signature verification evidence.

use std::path::Path;

use swft_core::errors::IngestError;
use swft_core::models::{EvidenceKind, ProjectRecord};
use swft_storage::queries::evidence;

use super::{EvidenceIngestResult, EvidenceManager};
use crate::parsers::load_signature;
use crate::validation::path_segment;

impl EvidenceManager<'_> {
    /// Record a verification payload. The image digest and outcome come from
    /// the caller; the file only has to be valid JSON.
    pub fn ingest_signature(
        &self,
        project: &ProjectRecord,
        run_id: &str,
        signature_path: &Path,
        digest: &str,
        verified: bool,
    ) -> Result<EvidenceIngestResult, IngestError> {
        let run_id = path_segment("run_id", run_id)?;
        let digest = digest.trim();
        if digest.is_empty() {
            return Err(IngestError::invalid("digest", "must not be empty"));
        }
        load_signature(signature_path)?;
        let pinned = self.pin(project, run_id, signature_path)?;

        let record = self.db.with_transaction(|tx| {
            let record =
                self.record_in(tx, project, run_id, EvidenceKind::Signature, &pinned)?;
            evidence::upsert_signature(tx, record.id, digest, verified)?;
            Ok::<_, IngestError>(record)
        })?;

        tracing::info!(
            kind = "signature",
            project = %project.key,
            run_id,
            evidence_id = record.id,
            verified,
            "ingested evidence"
        );

        Ok(EvidenceIngestResult {
            evidence_id: record.id,
            derived_count: 1,
            record,
        })
    }
}
