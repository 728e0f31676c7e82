//! Queries for baseline_profiles and baseline_controls.

use rusqlite::{params, Connection, OptionalExtension};
use swft_core::errors::StorageError;

use crate::to_storage_err;

/// Insert the profile or repoint its version ref. Returns the profile id.
pub fn upsert_profile(
    conn: &Connection,
    profile_name: &str,
    version_ref: i64,
) -> Result<i64, StorageError> {
    conn.query_row(
        "INSERT INTO baseline_profiles (profile_name, profile_version_ref)
         VALUES (?1, ?2)
         ON CONFLICT (profile_name) DO UPDATE SET profile_version_ref = excluded.profile_version_ref
         RETURNING id",
        params![profile_name, version_ref],
        |row| row.get(0),
    )
    .map_err(to_storage_err)
}

/// Replace the profile's membership with `control_ids`. Returns rows inserted.
pub fn replace_controls(
    conn: &Connection,
    profile_id: i64,
    control_ids: &[String],
) -> Result<usize, StorageError> {
    conn.execute(
        "DELETE FROM baseline_controls WHERE profile_id = ?1",
        params![profile_id],
    )
    .map_err(to_storage_err)?;

    let mut stmt = conn
        .prepare_cached(
            "INSERT INTO baseline_controls (profile_id, control_id) VALUES (?1, ?2)
             ON CONFLICT DO NOTHING",
        )
        .map_err(to_storage_err)?;
    let mut inserted = 0;
    for control_id in control_ids {
        inserted += stmt
            .execute(params![profile_id, control_id])
            .map_err(to_storage_err)?;
    }
    Ok(inserted)
}

/// `(id, profile_version_ref)` for a profile name.
pub fn find_profile(conn: &Connection, profile_name: &str) -> Result<Option<(i64, i64)>, StorageError> {
    conn.query_row(
        "SELECT id, profile_version_ref FROM baseline_profiles WHERE profile_name = ?1",
        params![profile_name],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )
    .optional()
    .map_err(to_storage_err)
}

/// Member control ids of the named profile, sorted.
pub fn controls_for_profile(conn: &Connection, profile_name: &str) -> Result<Vec<String>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT bc.control_id FROM baseline_controls bc
             JOIN baseline_profiles bp ON bp.id = bc.profile_id
             WHERE bp.profile_name = ?1
             ORDER BY bc.control_id",
        )
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![profile_name], |row| row.get(0))
        .map_err(to_storage_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(to_storage_err)
}
