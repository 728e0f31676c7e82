//! Queries for the runs table.

use rusqlite::{params, Connection, OptionalExtension};
use swft_core::errors::StorageError;
use swft_core::models::RunRecord;

use crate::to_storage_err;

/// Insert-or-fetch the run keyed by `(project_fk, run_id)`. Returns its id.
pub fn ensure_run(conn: &Connection, project_fk: i64, run_id: &str) -> Result<i64, StorageError> {
    conn.execute(
        "INSERT INTO runs (project_fk, run_id) VALUES (?1, ?2)
         ON CONFLICT (project_fk, run_id) DO NOTHING",
        params![project_fk, run_id],
    )
    .map_err(to_storage_err)?;
    find_run(conn, project_fk, run_id)?
        .map(|run| run.id)
        .ok_or_else(|| StorageError::SqliteError {
            message: format!("run '{run_id}' vanished after insert for project {project_fk}"),
        })
}

pub fn find_run(
    conn: &Connection,
    project_fk: i64,
    run_id: &str,
) -> Result<Option<RunRecord>, StorageError> {
    conn.query_row(
        "SELECT id, project_fk, run_id, created_at FROM runs
         WHERE project_fk = ?1 AND run_id = ?2",
        params![project_fk, run_id],
        |row| {
            Ok(RunRecord {
                id: row.get(0)?,
                project_fk: row.get(1)?,
                run_id: row.get(2)?,
                created_at: row.get(3)?,
            })
        },
    )
    .optional()
    .map_err(to_storage_err)
}

/// Runs for a project, oldest first.
pub fn list_runs(conn: &Connection, project_fk: i64) -> Result<Vec<RunRecord>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT id, project_fk, run_id, created_at FROM runs
             WHERE project_fk = ?1 ORDER BY id",
        )
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![project_fk], |row| {
            Ok(RunRecord {
                id: row.get(0)?,
                project_fk: row.get(1)?,
                run_id: row.get(2)?,
                created_at: row.get(3)?,
            })
        })
        .map_err(to_storage_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(to_storage_err)
}
