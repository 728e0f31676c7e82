//! Queries for the catalog_controls table.

use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use swft_core::errors::StorageError;
use swft_core::models::CatalogControl;

use crate::to_storage_err;

/// A persisted catalog control.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlRow {
    pub control_id: String,
    pub family: Option<String>,
    pub title: Option<String>,
    pub parameters: Vec<Value>,
    pub assessment_objectives: Vec<Value>,
    pub catalog_version_ref: i64,
}

/// Insert or overwrite a control, repointing it at `version_ref`.
pub fn upsert_control(
    conn: &Connection,
    control: &CatalogControl,
    version_ref: i64,
) -> Result<(), StorageError> {
    let parameters = encode(&control.parameters)?;
    let objectives = encode(&control.assessment_objectives)?;
    let mut stmt = conn
        .prepare_cached(
            "INSERT INTO catalog_controls (
                control_id, family, title, parameters_json,
                assessment_objectives_json, catalog_version_ref
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT (control_id) DO UPDATE SET
                family = excluded.family,
                title = excluded.title,
                parameters_json = excluded.parameters_json,
                assessment_objectives_json = excluded.assessment_objectives_json,
                catalog_version_ref = excluded.catalog_version_ref",
        )
        .map_err(to_storage_err)?;
    stmt.execute(params![
        control.control_id,
        control.family,
        control.title,
        parameters,
        objectives,
        version_ref
    ])
    .map_err(to_storage_err)?;
    Ok(())
}

pub fn get_control(conn: &Connection, control_id: &str) -> Result<Option<ControlRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT control_id, family, title, parameters_json,
                    assessment_objectives_json, catalog_version_ref
             FROM catalog_controls WHERE control_id = ?1",
        )
        .map_err(to_storage_err)?;
    let raw = stmt
        .query_row(params![control_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, i64>(5)?,
            ))
        })
        .optional()
        .map_err(to_storage_err)?;

    raw.map(|(control_id, family, title, params, objectives, version_ref)| {
        Ok(ControlRow {
            control_id,
            family,
            title,
            parameters: decode(&params)?,
            assessment_objectives: decode(&objectives)?,
            catalog_version_ref: version_ref,
        })
    })
    .transpose()
}

pub fn count_controls(conn: &Connection) -> Result<i64, StorageError> {
    conn.query_row("SELECT COUNT(*) FROM catalog_controls", [], |row| row.get(0))
        .map_err(to_storage_err)
}

pub fn count_for_version(conn: &Connection, version_ref: i64) -> Result<i64, StorageError> {
    conn.query_row(
        "SELECT COUNT(*) FROM catalog_controls WHERE catalog_version_ref = ?1",
        params![version_ref],
        |row| row.get(0),
    )
    .map_err(to_storage_err)
}

fn encode(values: &[Value]) -> Result<String, StorageError> {
    serde_json::to_string(values).map_err(|e| StorageError::SqliteError {
        message: format!("failed to encode control JSON: {e}"),
    })
}

fn decode(text: &str) -> Result<Vec<Value>, StorageError> {
    serde_json::from_str(text).map_err(|e| StorageError::SqliteError {
        message: format!("corrupt control JSON column: {e}"),
    })
}
