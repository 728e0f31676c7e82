//! Evidence ingestion for pipeline runs.
//!
//! Evidence files are pinned under `{store}/evidence/{project}/{run}` and
//! recorded keyed by content hash. The kind-specific ingestors in the
//! submodules parse before pinning and write their child rows in the same
//! transaction as the evidence row.

pub mod sbom;
pub mod signature;
pub mod trivy;

use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::Connection;
use serde::Serialize;
use swft_core::config::PathsConfig;
use swft_core::constants::PIN_CATEGORY_EVIDENCE;
use swft_core::errors::{FileError, IngestError};
use swft_core::models::{EvidenceKind, EvidenceRecord, ProjectRecord, RunRecord};
use swft_storage::queries::{evidence, runs};
use swft_storage::DatabaseManager;

use crate::pinning::{pin_source_file, PinnedFile};
use crate::validation::path_segment;

#[derive(Debug, Clone, Serialize)]
pub struct EvidenceIngestResult {
    pub evidence_id: i64,
    /// Child rows written for the evidence (components, findings, or 1 for a
    /// signature).
    pub derived_count: usize,
    pub record: EvidenceRecord,
}

/// A pinned evidence file, ready to be recorded.
#[derive(Debug, Clone)]
pub(crate) struct PinnedEvidence {
    pin: PinnedFile,
    size_bytes: i64,
    collected_at: String,
}

pub struct EvidenceManager<'a> {
    db: &'a DatabaseManager,
    paths: &'a PathsConfig,
}

impl<'a> EvidenceManager<'a> {
    pub fn new(db: &'a DatabaseManager, paths: &'a PathsConfig) -> Self {
        Self { db, paths }
    }

    /// Directory holding one run's evidence.
    pub fn run_dir(&self, project_key: &str, run_id: &str) -> PathBuf {
        self.paths
            .effective_store()
            .join(PIN_CATEGORY_EVIDENCE)
            .join(project_key)
            .join(run_id)
    }

    /// Pin and record `source` without parsing it.
    pub fn ingest_file(
        &self,
        project: &ProjectRecord,
        run_id: &str,
        kind: EvidenceKind,
        source: &Path,
    ) -> Result<EvidenceRecord, IngestError> {
        let run_id = path_segment("run_id", run_id)?;
        let pinned = self.pin(project, run_id, source)?;
        self.db
            .with_transaction(|tx| self.record_in(tx, project, run_id, kind, &pinned))
    }

    pub fn list_runs(&self, project: &ProjectRecord) -> Result<Vec<RunRecord>, IngestError> {
        self.db
            .with_reader(|conn| Ok(runs::list_runs(conn, project.id)?))
    }

    /// Evidence linked to `run_id`, including evidence whose current owner is
    /// a later run.
    pub fn evidence_for_run(
        &self,
        project: &ProjectRecord,
        run_id: &str,
    ) -> Result<Vec<EvidenceRecord>, IngestError> {
        self.db.with_reader(|conn| {
            let run = runs::find_run(conn, project.id, run_id)?.ok_or_else(|| {
                IngestError::not_found("run", format!("{}/{run_id}", project.key))
            })?;
            Ok(evidence::evidence_for_run(conn, run.id)?)
        })
    }

    pub(crate) fn pin(
        &self,
        project: &ProjectRecord,
        run_id: &str,
        source: &Path,
    ) -> Result<PinnedEvidence, IngestError> {
        let source_stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("evidence");
        let stem = format!("{}-{run_id}-{source_stem}", project.key);
        let pin = pin_source_file(source, &self.run_dir(&project.key, run_id), &stem)?;

        let size_bytes = std::fs::metadata(&pin.path)
            .map_err(|e| FileError::Unreadable {
                path: pin.path.clone(),
                message: e.to_string(),
            })?
            .len();

        Ok(PinnedEvidence {
            pin,
            size_bytes: i64::try_from(size_bytes).unwrap_or(i64::MAX),
            collected_at: Utc::now().to_rfc3339(),
        })
    }

    /// Ensure the run, upsert the evidence row by content hash and link it.
    pub(crate) fn record_in(
        &self,
        conn: &Connection,
        project: &ProjectRecord,
        run_id: &str,
        kind: EvidenceKind,
        pinned: &PinnedEvidence,
    ) -> Result<EvidenceRecord, IngestError> {
        let run_fk = runs::ensure_run(conn, project.id, run_id)?;
        let content_hash = pinned.pin.sha256.as_str();

        if let Some(previous) = evidence::find_by_hash(conn, content_hash)? {
            if previous.run_fk != run_fk {
                tracing::warn!(
                    content_hash,
                    evidence_id = previous.id,
                    previous_run = %previous.run_id,
                    previous_run_fk = previous.run_fk,
                    project = %project.key,
                    run_id,
                    "identical evidence re-ingested under another run, reassigning owner"
                );
            }
        }

        let file_path = pinned.pin.path.display().to_string();
        let evidence_id = evidence::upsert_evidence(
            conn,
            &evidence::NewEvidence {
                kind,
                file_path: &file_path,
                content_hash,
                size_bytes: pinned.size_bytes,
                collected_at: &pinned.collected_at,
                run_fk,
                run_id,
            },
        )?;
        evidence::link_run(conn, run_fk, evidence_id)?;

        Ok(EvidenceRecord {
            id: evidence_id,
            kind,
            file_path: pinned.pin.path.clone(),
            content_hash: content_hash.to_string(),
            size_bytes: pinned.size_bytes,
            collected_at: pinned.collected_at.clone(),
            run_fk,
            run_id: run_id.to_string(),
        })
    }
}
