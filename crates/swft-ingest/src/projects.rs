//! Project boundary metadata.

use swft_core::errors::{IngestError, StorageError};
use swft_core::models::ProjectRecord;
use swft_core::strings::normalize_list;
use swft_storage::queries::projects;
use swft_storage::DatabaseManager;

use crate::validation::path_segment;

/// Caller-supplied project fields. Services and regions are trimmed and
/// deduplicated; a blank boundary description is stored as absent.
#[derive(Debug, Clone, Default)]
pub struct ProjectInput<'a> {
    pub key: &'a str,
    pub services: &'a [String],
    pub regions: &'a [String],
    pub boundary_description: Option<&'a str>,
}

pub struct ProjectStore<'a> {
    db: &'a DatabaseManager,
}

impl<'a> ProjectStore<'a> {
    pub fn new(db: &'a DatabaseManager) -> Self {
        Self { db }
    }

    /// Create a project. Fails with `AlreadyExists` when the key is taken.
    pub fn create_project(&self, input: &ProjectInput<'_>) -> Result<ProjectRecord, IngestError> {
        let key = path_segment("project_key", input.key)?;
        let boundary = boundary_of(input);
        self.db.with_transaction(|tx| {
            let id = projects::insert_project(tx, key, boundary)?.ok_or_else(|| {
                IngestError::AlreadyExists {
                    entity: "project".to_string(),
                    key: key.to_string(),
                }
            })?;
            write_collections(tx, id, input)?;
            reload(tx, key)
        })
    }

    /// Create or update a project, replacing its boundary, services and
    /// regions together.
    pub fn upsert_project(&self, input: &ProjectInput<'_>) -> Result<ProjectRecord, IngestError> {
        let key = path_segment("project_key", input.key)?;
        let boundary = boundary_of(input);
        self.db.with_transaction(|tx| {
            let id = projects::upsert_project(tx, key, boundary)?;
            write_collections(tx, id, input)?;
            reload(tx, key)
        })
    }

    pub fn get_project(&self, key: &str) -> Result<ProjectRecord, IngestError> {
        let key = key.trim();
        self.db.with_reader(|conn| {
            projects::get_project(conn, key)?.ok_or_else(|| IngestError::not_found("project", key))
        })
    }

    /// Every project, ordered by key.
    pub fn list_projects(&self) -> Result<Vec<ProjectRecord>, IngestError> {
        self.db
            .with_reader(|conn| Ok(projects::list_projects(conn)?))
    }
}

fn boundary_of<'a>(input: &ProjectInput<'a>) -> Option<&'a str> {
    input
        .boundary_description
        .map(str::trim)
        .filter(|b| !b.is_empty())
}

fn write_collections(
    conn: &rusqlite::Connection,
    project_fk: i64,
    input: &ProjectInput<'_>,
) -> Result<(), StorageError> {
    projects::replace_services(conn, project_fk, &normalize_list(input.services))?;
    projects::replace_regions(conn, project_fk, &normalize_list(input.regions))
}

fn reload(conn: &rusqlite::Connection, key: &str) -> Result<ProjectRecord, IngestError> {
    projects::get_project(conn, key)?.ok_or_else(|| IngestError::not_found("project", key))
}
