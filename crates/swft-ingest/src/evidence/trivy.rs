//! Trivy vulnerability report evidence.

use std::path::Path;

use swft_core::errors::IngestError;
use swft_core::models::{EvidenceKind, ProjectRecord};
use swft_storage::queries::evidence;

use super::{EvidenceIngestResult, EvidenceManager};
use crate::parsers::load_trivy_report;
use crate::validation::path_segment;

impl EvidenceManager<'_> {
    /// Record a Trivy report and replace its findings. `artifact_hint` names
    /// the artifact for findings whose result carried no `Target`.
    pub fn ingest_trivy(
        &self,
        project: &ProjectRecord,
        run_id: &str,
        report_path: &Path,
        artifact_hint: Option<&str>,
    ) -> Result<EvidenceIngestResult, IngestError> {
        let run_id = path_segment("run_id", run_id)?;
        let mut findings = load_trivy_report(report_path)?;
        if let Some(hint) = artifact_hint.map(str::trim).filter(|h| !h.is_empty()) {
            for finding in findings.iter_mut().filter(|f| f.artifact.is_none()) {
                finding.artifact = Some(hint.to_string());
            }
        }
        let pinned = self.pin(project, run_id, report_path)?;

        let (record, derived_count) = self.db.with_transaction(|tx| {
            let record = self.record_in(tx, project, run_id, EvidenceKind::Trivy, &pinned)?;
            let written = evidence::replace_trivy_findings(tx, record.id, &findings)?;
            Ok::<_, IngestError>((record, written))
        })?;

        tracing::info!(
            kind = "trivy",
            project = %project.key,
            run_id,
            evidence_id = record.id,
            findings = derived_count,
            "ingested evidence"
        );

        Ok(EvidenceIngestResult {
            evidence_id: record.id,
            derived_count,
            record,
        })
    }
}
