//! Queries for projects and their service/region collections.

use rusqlite::{params, Connection, OptionalExtension};
use swft_core::errors::StorageError;
use swft_core::models::ProjectRecord;

use crate::to_storage_err;

/// The two per-project string collections. Each variant carries its own
/// fixed SQL; table and column names are never interpolated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectCollection {
    Services,
    Regions,
}

impl ProjectCollection {
    fn delete_sql(self) -> &'static str {
        match self {
            Self::Services => "DELETE FROM project_services WHERE project_fk = ?1",
            Self::Regions => "DELETE FROM project_regions WHERE project_fk = ?1",
        }
    }

    fn insert_sql(self) -> &'static str {
        match self {
            Self::Services => {
                "INSERT INTO project_services (project_fk, service_name) VALUES (?1, ?2)
                 ON CONFLICT DO NOTHING"
            }
            Self::Regions => {
                "INSERT INTO project_regions (project_fk, region_name) VALUES (?1, ?2)
                 ON CONFLICT DO NOTHING"
            }
        }
    }

    fn select_sql(self) -> &'static str {
        match self {
            Self::Services => {
                "SELECT service_name FROM project_services WHERE project_fk = ?1 ORDER BY id"
            }
            Self::Regions => {
                "SELECT region_name FROM project_regions WHERE project_fk = ?1 ORDER BY id"
            }
        }
    }
}

/// Replace the project's services.
pub fn replace_services(conn: &Connection, project_fk: i64, values: &[String]) -> Result<(), StorageError> {
    replace_collection(conn, ProjectCollection::Services, project_fk, values)
}

/// Replace the project's regions.
pub fn replace_regions(conn: &Connection, project_fk: i64, values: &[String]) -> Result<(), StorageError> {
    replace_collection(conn, ProjectCollection::Regions, project_fk, values)
}

pub fn list_collection(
    conn: &Connection,
    collection: ProjectCollection,
    project_fk: i64,
) -> Result<Vec<String>, StorageError> {
    let mut stmt = conn
        .prepare_cached(collection.select_sql())
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map(params![project_fk], |row| row.get(0))
        .map_err(to_storage_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(to_storage_err)
}

fn replace_collection(
    conn: &Connection,
    collection: ProjectCollection,
    project_fk: i64,
    values: &[String],
) -> Result<(), StorageError> {
    conn.execute(collection.delete_sql(), params![project_fk])
        .map_err(to_storage_err)?;
    let mut stmt = conn
        .prepare_cached(collection.insert_sql())
        .map_err(to_storage_err)?;
    for value in values {
        stmt.execute(params![project_fk, value])
            .map_err(to_storage_err)?;
    }
    Ok(())
}

/// Insert a new project. Returns `None` when the key is taken.
pub fn insert_project(
    conn: &Connection,
    key: &str,
    boundary_description: Option<&str>,
) -> Result<Option<i64>, StorageError> {
    let changed = conn
        .execute(
            "INSERT INTO projects (project_key, boundary_description) VALUES (?1, ?2)
             ON CONFLICT (project_key) DO NOTHING",
            params![key, boundary_description],
        )
        .map_err(to_storage_err)?;
    Ok((changed == 1).then(|| conn.last_insert_rowid()))
}

/// Insert or update the boundary description. Returns the project id.
pub fn upsert_project(
    conn: &Connection,
    key: &str,
    boundary_description: Option<&str>,
) -> Result<i64, StorageError> {
    conn.query_row(
        "INSERT INTO projects (project_key, boundary_description) VALUES (?1, ?2)
         ON CONFLICT (project_key) DO UPDATE SET boundary_description = excluded.boundary_description
         RETURNING id",
        params![key, boundary_description],
        |row| row.get(0),
    )
    .map_err(to_storage_err)
}

/// Full record including collections.
pub fn get_project(conn: &Connection, key: &str) -> Result<Option<ProjectRecord>, StorageError> {
    let row: Option<(i64, String, Option<String>)> = conn
        .query_row(
            "SELECT id, project_key, boundary_description FROM projects WHERE project_key = ?1",
            params![key],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .optional()
        .map_err(to_storage_err)?;
    row.map(|(id, key, boundary)| load_record(conn, id, key, boundary))
        .transpose()
}

/// Every project, ordered by key.
pub fn list_projects(conn: &Connection) -> Result<Vec<ProjectRecord>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT id, project_key, boundary_description FROM projects ORDER BY project_key",
        )
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
            ))
        })
        .map_err(to_storage_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(to_storage_err)?;

    rows.into_iter()
        .map(|(id, key, boundary)| load_record(conn, id, key, boundary))
        .collect()
}

fn load_record(
    conn: &Connection,
    id: i64,
    key: String,
    boundary_description: Option<String>,
) -> Result<ProjectRecord, StorageError> {
    Ok(ProjectRecord {
        id,
        key,
        services: list_collection(conn, ProjectCollection::Services, id)?,
        regions: list_collection(conn, ProjectCollection::Regions, id)?,
        boundary_description,
    })
}
