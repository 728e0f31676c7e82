//! Queries for parameter_values and implemented_requirements.

use std::collections::BTreeMap;

use rusqlite::{params, Connection, OptionalExtension};
use swft_core::errors::StorageError;

use crate::to_storage_err;

pub fn upsert_value(
    conn: &Connection,
    project_fk: i64,
    control_id: &str,
    param_id: &str,
    value: &str,
) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO parameter_values (project_fk, control_id, param_id, value)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT (project_fk, control_id, param_id) DO UPDATE SET value = excluded.value",
        params![project_fk, control_id, param_id, value],
    )
    .map_err(to_storage_err)?;
    Ok(())
}

/// `param_id -> value` for one project's control.
pub fn values_for_control(
    conn: &Connection,
    project_fk: i64,
    control_id: &str,
) -> Result<BTreeMap<String, String>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT param_id, value FROM parameter_values
             WHERE project_fk = ?1 AND control_id = ?2",
        )
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![project_fk, control_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })
        .map_err(to_storage_err)?;
    rows.collect::<Result<BTreeMap<_, _>, _>>()
        .map_err(to_storage_err)
}

/// Insert a placeholder requirement row unless one exists.
pub fn ensure_implemented_requirement(
    conn: &Connection,
    project_fk: i64,
    control_id: &str,
    ownership: &str,
    status: &str,
) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO implemented_requirements (project_fk, control_id, ownership, status)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT (project_fk, control_id) DO NOTHING",
        params![project_fk, control_id, ownership, status],
    )
    .map_err(to_storage_err)?;
    Ok(())
}

/// `(ownership, status)` for a project's control.
pub fn get_implemented_requirement(
    conn: &Connection,
    project_fk: i64,
    control_id: &str,
) -> Result<Option<(String, String)>, StorageError> {
    conn.query_row(
        "SELECT ownership, status FROM implemented_requirements
         WHERE project_fk = ?1 AND control_id = ?2",
        params![project_fk, control_id],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )
    .optional()
    .map_err(to_storage_err)
}
