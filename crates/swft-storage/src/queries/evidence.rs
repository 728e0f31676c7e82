//! Queries for evidence files, run links and per-kind child rows.

use std::path::PathBuf;

use rusqlite::{params, Connection, OptionalExtension, Row};
use swft_core::errors::StorageError;
use swft_core::models::{EvidenceKind, EvidenceRecord, SbomComponent, TrivyFinding};

use crate::to_storage_err;

/// Columns written on insert and refreshed on a content-hash conflict.
#[derive(Debug, Clone)]
pub struct NewEvidence<'a> {
    pub kind: EvidenceKind,
    pub file_path: &'a str,
    pub content_hash: &'a str,
    pub size_bytes: i64,
    pub collected_at: &'a str,
    /// Owning run; `run_id` is its id.
    pub run_fk: i64,
    pub run_id: &'a str,
}

/// An evidence_files row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceRow {
    pub id: i64,
    pub kind: EvidenceKind,
    pub file_path: String,
    pub content_hash: String,
    pub size_bytes: i64,
    pub collected_at: String,
    pub run_fk: i64,
    pub run_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SbomComponentRow {
    pub name: String,
    pub version: Option<String>,
    pub purl: Option<String>,
    pub licenses: String,
}

fn parse_kind(raw: String) -> rusqlite::Result<EvidenceKind> {
    raw.parse().map_err(|e: String| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            rusqlite::types::Type::Text,
            e.into(),
        )
    })
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<EvidenceRow> {
    Ok(EvidenceRow {
        id: row.get(0)?,
        kind: parse_kind(row.get(1)?)?,
        file_path: row.get(2)?,
        content_hash: row.get(3)?,
        size_bytes: row.get(4)?,
        collected_at: row.get(5)?,
        run_fk: row.get(6)?,
        run_id: row.get(7)?,
    })
}

pub fn find_by_hash(conn: &Connection, content_hash: &str) -> Result<Option<EvidenceRow>, StorageError> {
    conn.query_row(
        "SELECT id, kind, file_path, content_hash, size_bytes, collected_at, run_fk, run_id
         FROM evidence_files WHERE content_hash = ?1",
        params![content_hash],
        map_row,
    )
    .optional()
    .map_err(to_storage_err)
}

/// Insert, or refresh every column of the row with the same content hash.
/// Returns the evidence id.
pub fn upsert_evidence(conn: &Connection, evidence: &NewEvidence<'_>) -> Result<i64, StorageError> {
    conn.query_row(
        "INSERT INTO evidence_files (kind, file_path, content_hash, size_bytes, collected_at, run_fk, run_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT (content_hash) DO UPDATE SET
            kind = excluded.kind,
            file_path = excluded.file_path,
            size_bytes = excluded.size_bytes,
            collected_at = excluded.collected_at,
            run_fk = excluded.run_fk,
            run_id = excluded.run_id
         RETURNING id",
        params![
            evidence.kind.as_str(),
            evidence.file_path,
            evidence.content_hash,
            evidence.size_bytes,
            evidence.collected_at,
            evidence.run_fk,
            evidence.run_id
        ],
        |row| row.get(0),
    )
    .map_err(to_storage_err)
}

/// Link evidence to a run. Idempotent; returns whether a new link was written.
pub fn link_run(conn: &Connection, run_fk: i64, evidence_fk: i64) -> Result<bool, StorageError> {
    let changed = conn
        .execute(
            "INSERT INTO run_evidence (run_fk, evidence_fk) VALUES (?1, ?2)
             ON CONFLICT DO NOTHING",
            params![run_fk, evidence_fk],
        )
        .map_err(to_storage_err)?;
    Ok(changed == 1)
}

/// Evidence linked to a run, with the run's own id as provenance.
pub fn evidence_for_run(conn: &Connection, run_fk: i64) -> Result<Vec<EvidenceRecord>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT e.id, e.kind, e.file_path, e.content_hash, e.size_bytes, e.collected_at,
                    r.id, r.run_id
             FROM run_evidence re
             JOIN evidence_files e ON e.id = re.evidence_fk
             JOIN runs r ON r.id = re.run_fk
             WHERE re.run_fk = ?1
             ORDER BY e.id",
        )
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![run_fk], |row| {
            Ok(EvidenceRecord {
                id: row.get(0)?,
                kind: parse_kind(row.get(1)?)?,
                file_path: PathBuf::from(row.get::<_, String>(2)?),
                content_hash: row.get(3)?,
                size_bytes: row.get(4)?,
                collected_at: row.get(5)?,
                run_fk: row.get(6)?,
                run_id: row.get(7)?,
            })
        })
        .map_err(to_storage_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(to_storage_err)
}

/// Run ids linked to an evidence row, ordered by run id.
pub fn runs_for_evidence(conn: &Connection, evidence_fk: i64) -> Result<Vec<String>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT r.run_id FROM run_evidence re JOIN runs r ON r.id = re.run_fk
             WHERE re.evidence_fk = ?1 ORDER BY r.run_id",
        )
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![evidence_fk], |row| row.get(0))
        .map_err(to_storage_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(to_storage_err)
}

pub fn count_evidence(conn: &Connection) -> Result<i64, StorageError> {
    conn.query_row("SELECT COUNT(*) FROM evidence_files", [], |row| row.get(0))
        .map_err(to_storage_err)
}

/// Replace the SBOM components of one evidence row. Returns rows inserted.
pub fn replace_sbom_components(
    conn: &Connection,
    evidence_fk: i64,
    components: &[SbomComponent],
) -> Result<usize, StorageError> {
    conn.execute(
        "DELETE FROM sbom_components WHERE evidence_fk = ?1",
        params![evidence_fk],
    )
    .map_err(to_storage_err)?;
    let mut stmt = conn
        .prepare_cached(
            "INSERT INTO sbom_components (evidence_fk, name, version, purl, licenses)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .map_err(to_storage_err)?;
    for component in components {
        stmt.execute(params![
            evidence_fk,
            component.name,
            component.version,
            component.purl,
            component.licenses.join(", ")
        ])
        .map_err(to_storage_err)?;
    }
    Ok(components.len())
}

pub fn sbom_components(conn: &Connection, evidence_fk: i64) -> Result<Vec<SbomComponentRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT name, version, purl, licenses FROM sbom_components
             WHERE evidence_fk = ?1 ORDER BY id",
        )
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![evidence_fk], |row| {
            Ok(SbomComponentRow {
                name: row.get(0)?,
                version: row.get(1)?,
                purl: row.get(2)?,
                licenses: row.get(3)?,
            })
        })
        .map_err(to_storage_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(to_storage_err)
}

/// Replace the scan findings of one evidence row. Returns rows inserted.
pub fn replace_trivy_findings(
    conn: &Connection,
    evidence_fk: i64,
    findings: &[TrivyFinding],
) -> Result<usize, StorageError> {
    conn.execute(
        "DELETE FROM trivy_findings WHERE evidence_fk = ?1",
        params![evidence_fk],
    )
    .map_err(to_storage_err)?;
    let mut stmt = conn
        .prepare_cached(
            "INSERT INTO trivy_findings (
                evidence_fk, cve_id, severity, pkg, installed_version,
                fixed_version, artifact, path
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .map_err(to_storage_err)?;
    for finding in findings {
        stmt.execute(params![
            evidence_fk,
            finding.cve_id,
            finding.severity,
            finding.pkg,
            finding.installed_version,
            finding.fixed_version,
            finding.artifact,
            finding.path
        ])
        .map_err(to_storage_err)?;
    }
    Ok(findings.len())
}

pub fn trivy_findings(conn: &Connection, evidence_fk: i64) -> Result<Vec<TrivyFinding>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT cve_id, severity, pkg, installed_version, fixed_version, artifact, path
             FROM trivy_findings WHERE evidence_fk = ?1 ORDER BY id",
        )
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![evidence_fk], |row| {
            Ok(TrivyFinding {
                cve_id: row.get(0)?,
                severity: row.get(1)?,
                pkg: row.get(2)?,
                installed_version: row.get(3)?,
                fixed_version: row.get(4)?,
                artifact: row.get(5)?,
                path: row.get(6)?,
            })
        })
        .map_err(to_storage_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(to_storage_err)
}

/// One verification row per evidence id; a re-ingest overwrites it.
pub fn upsert_signature(
    conn: &Connection,
    evidence_fk: i64,
    image_digest: &str,
    verified: bool,
) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO signatures (evidence_fk, image_digest, verified) VALUES (?1, ?2, ?3)
         ON CONFLICT (evidence_fk) DO UPDATE SET
            image_digest = excluded.image_digest,
            verified = excluded.verified",
        params![evidence_fk, image_digest, verified],
    )
    .map_err(to_storage_err)?;
    Ok(())
}

/// `(image_digest, verified)` for an evidence row.
pub fn get_signature(conn: &Connection, evidence_fk: i64) -> Result<Option<(String, bool)>, StorageError> {
    conn.query_row(
        "SELECT image_digest, verified FROM signatures WHERE evidence_fk = ?1",
        params![evidence_fk],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )
    .optional()
    .map_err(to_storage_err)
}
