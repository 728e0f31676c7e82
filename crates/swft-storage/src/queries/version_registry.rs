//! Queries for the version_registry table.

use rusqlite::{params, Connection, OptionalExtension, Row};
use swft_core::errors::StorageError;
use swft_core::models::VersionRecord;

use crate::to_storage_err;

const COLUMNS: &str = "id, kind, name, version, content_hash, source_uri";

fn map_row(row: &Row<'_>) -> rusqlite::Result<VersionRecord> {
    Ok(VersionRecord {
        id: row.get(0)?,
        kind: row.get(1)?,
        name: row.get(2)?,
        version_label: row.get(3)?,
        content_hash: row.get(4)?,
        source_uri: row.get(5)?,
    })
}

/// Look up the record for `(kind, name)`.
pub fn find(conn: &Connection, kind: &str, name: &str) -> Result<Option<VersionRecord>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {COLUMNS} FROM version_registry WHERE kind = ?1 AND name = ?2"
        ))
        .map_err(to_storage_err)?;
    stmt.query_row(params![kind, name], map_row)
        .optional()
        .map_err(to_storage_err)
}

pub fn get(conn: &Connection, id: i64) -> Result<Option<VersionRecord>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!("SELECT {COLUMNS} FROM version_registry WHERE id = ?1"))
        .map_err(to_storage_err)?;
    stmt.query_row(params![id], map_row)
        .optional()
        .map_err(to_storage_err)
}

/// Insert a new record. Returns `None` when `(kind, name)` already exists.
pub fn insert_if_absent(
    conn: &Connection,
    kind: &str,
    name: &str,
    version: &str,
    content_hash: &str,
    source_uri: &str,
) -> Result<Option<i64>, StorageError> {
    let changed = conn
        .execute(
            "INSERT INTO version_registry (kind, name, version, content_hash, source_uri)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (kind, name) DO NOTHING",
            params![kind, name, version, content_hash, source_uri],
        )
        .map_err(to_storage_err)?;
    Ok((changed == 1).then(|| conn.last_insert_rowid()))
}

/// Repoint label and source. Never touches `content_hash`.
pub fn update_metadata(
    conn: &Connection,
    id: i64,
    version: &str,
    source_uri: &str,
) -> Result<(), StorageError> {
    conn.execute(
        "UPDATE version_registry SET version = ?1, source_uri = ?2 WHERE id = ?3",
        params![version, source_uri, id],
    )
    .map_err(to_storage_err)?;
    Ok(())
}

/// All records, optionally filtered by kind, ordered by kind then name.
pub fn list(conn: &Connection, kind: Option<&str>) -> Result<Vec<VersionRecord>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {COLUMNS} FROM version_registry
             WHERE ?1 IS NULL OR kind = ?1
             ORDER BY kind, name"
        ))
        .map_err(to_storage_err)?;
    let rows = stmt.query_map(params![kind], map_row).map_err(to_storage_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(to_storage_err)
}

pub fn count(conn: &Connection) -> Result<i64, StorageError> {
    conn.query_row("SELECT COUNT(*) FROM version_registry", [], |row| row.get(0))
        .map_err(to_storage_err)
}
