//! Version registry: one accepted content hash per `(kind, name)`.
//!
//! ```text
//! absent ──insert──▶ pinned
//! pinned + same hash ──▶ pinned (label/source may be repointed)
//! pinned + other hash ──▶ VersionConflict
//! ```
//!
//! Callers run this inside the same transaction as their kind-specific
//! writes, so a conflict rolls all of them back.

use rusqlite::Connection;
use swft_core::errors::{RegistryError, StorageError};
use swft_core::models::{ArtifactKind, VersionRecord};

use crate::queries::version_registry;

/// Accept or validate `(kind, name)` at `content_hash`.
pub fn ensure_version(
    conn: &Connection,
    kind: ArtifactKind,
    name: &str,
    version_label: &str,
    content_hash: &str,
    source_uri: &str,
) -> Result<VersionRecord, RegistryError> {
    let kind_str = kind.as_str();

    let existing = match version_registry::find(conn, kind_str, name)? {
        Some(record) => record,
        None => {
            match version_registry::insert_if_absent(
                conn,
                kind_str,
                name,
                version_label,
                content_hash,
                source_uri,
            )? {
                Some(id) => {
                    return Ok(VersionRecord {
                        id,
                        kind: kind_str.to_string(),
                        name: name.to_string(),
                        version_label: version_label.to_string(),
                        content_hash: content_hash.to_string(),
                        source_uri: source_uri.to_string(),
                    });
                }
                // Another writer inserted between our read and insert.
                None => version_registry::find(conn, kind_str, name)?.ok_or_else(|| {
                    StorageError::SqliteError {
                        message: format!("version '{name}' ({kind_str}) missing after conflict"),
                    }
                })?,
            }
        }
    };

    if existing.content_hash != content_hash {
        tracing::warn!(
            kind = kind_str,
            artifact = name,
            existing_hash = %existing.content_hash,
            incoming_hash = content_hash,
            "version conflict"
        );
        return Err(RegistryError::VersionConflict {
            kind: kind_str.to_string(),
            name: name.to_string(),
            existing_hash: existing.content_hash,
            incoming_hash: content_hash.to_string(),
        });
    }

    if existing.version_label == version_label && existing.source_uri == source_uri {
        return Ok(existing);
    }

    tracing::debug!(
        kind = kind_str,
        artifact = name,
        id = existing.id,
        from_label = %existing.version_label,
        to_label = version_label,
        "repointing version metadata"
    );
    version_registry::update_metadata(conn, existing.id, version_label, source_uri)?;
    Ok(VersionRecord {
        version_label: version_label.to_string(),
        source_uri: source_uri.to_string(),
        ..existing
    })
}
