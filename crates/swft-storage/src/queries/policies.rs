//! Queries for policy initiatives, definitions, mappings and states.

use rusqlite::{params, Connection, OptionalExtension};
use swft_core::errors::StorageError;

use crate::to_storage_err;

/// A persisted compliance observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyStateRow {
    pub control_id: String,
    pub policy_definition_id: String,
    pub assignment_id: String,
    pub resource_id: String,
    pub compliance_state: String,
    /// RFC 3339, UTC.
    pub last_evaluated: String,
}

pub fn find_initiative(
    conn: &Connection,
    initiative_id: &str,
    scope: &str,
) -> Result<Option<i64>, StorageError> {
    conn.query_row(
        "SELECT id FROM policy_initiatives WHERE initiative_id = ?1 AND scope = ?2",
        params![initiative_id, scope],
        |row| row.get(0),
    )
    .optional()
    .map_err(to_storage_err)
}

/// Insert the initiative or repoint its version ref. Returns the row id.
pub fn upsert_initiative(
    conn: &Connection,
    initiative_id: &str,
    scope: &str,
    version_ref: i64,
) -> Result<i64, StorageError> {
    conn.query_row(
        "INSERT INTO policy_initiatives (initiative_id, scope, initiative_version_ref)
         VALUES (?1, ?2, ?3)
         ON CONFLICT (initiative_id, scope)
         DO UPDATE SET initiative_version_ref = excluded.initiative_version_ref
         RETURNING id",
        params![initiative_id, scope, version_ref],
        |row| row.get(0),
    )
    .map_err(to_storage_err)
}

/// Definitions are mutable metadata: display name and category overwrite.
pub fn upsert_definition(
    conn: &Connection,
    policy_definition_id: &str,
    display_name: Option<&str>,
    category: Option<&str>,
) -> Result<(), StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "INSERT INTO policy_definitions (policy_definition_id, display_name, category)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (policy_definition_id) DO UPDATE SET
                display_name = excluded.display_name,
                category = excluded.category",
        )
        .map_err(to_storage_err)?;
    stmt.execute(params![policy_definition_id, display_name, category])
        .map_err(to_storage_err)?;
    Ok(())
}

/// `(display_name, category)` for a definition.
pub fn get_definition(
    conn: &Connection,
    policy_definition_id: &str,
) -> Result<Option<(Option<String>, Option<String>)>, StorageError> {
    conn.query_row(
        "SELECT display_name, category FROM policy_definitions WHERE policy_definition_id = ?1",
        params![policy_definition_id],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )
    .optional()
    .map_err(to_storage_err)
}

pub fn delete_mappings(conn: &Connection, initiative_fk: i64) -> Result<usize, StorageError> {
    conn.execute(
        "DELETE FROM policy_mappings WHERE initiative_fk = ?1",
        params![initiative_fk],
    )
    .map_err(to_storage_err)
}

/// Returns whether a new row was written.
pub fn insert_mapping(
    conn: &Connection,
    initiative_fk: i64,
    control_id: &str,
    policy_definition_id: &str,
) -> Result<bool, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "INSERT INTO policy_mappings (initiative_fk, control_id, policy_definition_fk)
             VALUES (?1, ?2, ?3)
             ON CONFLICT DO NOTHING",
        )
        .map_err(to_storage_err)?;
    let changed = stmt
        .execute(params![initiative_fk, control_id, policy_definition_id])
        .map_err(to_storage_err)?;
    Ok(changed == 1)
}

pub fn count_mappings(conn: &Connection, initiative_fk: i64) -> Result<i64, StorageError> {
    conn.query_row(
        "SELECT COUNT(*) FROM policy_mappings WHERE initiative_fk = ?1",
        params![initiative_fk],
        |row| row.get(0),
    )
    .map_err(to_storage_err)
}

/// Control ids the initiative maps to this definition.
pub fn controls_for_policy(
    conn: &Connection,
    initiative_fk: i64,
    policy_definition_id: &str,
) -> Result<Vec<String>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT control_id FROM policy_mappings
             WHERE initiative_fk = ?1 AND policy_definition_fk = ?2
             ORDER BY control_id",
        )
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![initiative_fk, policy_definition_id], |row| row.get(0))
        .map_err(to_storage_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(to_storage_err)
}

/// Delete any row sharing the five-part key, then insert `state`.
pub fn replace_state(
    conn: &Connection,
    initiative_fk: i64,
    state: &PolicyStateRow,
) -> Result<(), StorageError> {
    let mut delete = conn
        .prepare_cached(
            "DELETE FROM policy_states
             WHERE initiative_fk = ?1 AND control_id = ?2 AND policy_definition_fk = ?3
               AND assignment_id = ?4 AND resource_id = ?5",
        )
        .map_err(to_storage_err)?;
    delete
        .execute(params![
            initiative_fk,
            state.control_id,
            state.policy_definition_id,
            state.assignment_id,
            state.resource_id
        ])
        .map_err(to_storage_err)?;

    let mut insert = conn
        .prepare_cached(
            "INSERT INTO policy_states (
                initiative_fk, control_id, policy_definition_fk, assignment_id,
                resource_id, compliance_state, last_evaluated
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .map_err(to_storage_err)?;
    insert
        .execute(params![
            initiative_fk,
            state.control_id,
            state.policy_definition_id,
            state.assignment_id,
            state.resource_id,
            state.compliance_state,
            state.last_evaluated
        ])
        .map_err(to_storage_err)?;
    Ok(())
}

/// All observations for an initiative, in key order.
pub fn states_for_initiative(
    conn: &Connection,
    initiative_fk: i64,
) -> Result<Vec<PolicyStateRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT control_id, policy_definition_fk, assignment_id, resource_id,
                    compliance_state, last_evaluated
             FROM policy_states WHERE initiative_fk = ?1
             ORDER BY control_id, policy_definition_fk, assignment_id, resource_id",
        )
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![initiative_fk], |row| {
            Ok(PolicyStateRow {
                control_id: row.get(0)?,
                policy_definition_id: row.get(1)?,
                assignment_id: row.get(2)?,
                resource_id: row.get(3)?,
                compliance_state: row.get(4)?,
                last_evaluated: row.get(5)?,
            })
        })
        .map_err(to_storage_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(to_storage_err)
}
