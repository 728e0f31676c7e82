//! Checksummed, forward-only SQL migrations.
//!
//! Migrations are ordered by filename. Each applied file is recorded in
//! `swft_schema_migrations` with the SHA-256 of its bytes; a recorded file
//! whose bytes have since changed stops the runner before anything else is
//! applied. There is no down path.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use swft_core::constants::MIGRATION_TABLE;
use swft_core::digest::sha256_hex;
use swft_core::errors::StorageError;

use crate::connection::writer::with_immediate_transaction;
use crate::to_storage_err;

/// Schema files compiled into the crate, in application order.
const EMBEDDED: &[(&str, &str)] = &[
    ("0001_authority.sql", include_str!("../../migrations/0001_authority.sql")),
    (
        "0002_projects_evidence.sql",
        include_str!("../../migrations/0002_projects_evidence.sql"),
    ),
];

/// One migration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    pub filename: String,
    pub sql: String,
    /// SHA-256 hex of the file bytes.
    pub checksum: String,
}

impl Migration {
    pub fn new(filename: impl Into<String>, sql: impl Into<String>) -> Self {
        let sql = sql.into();
        Self {
            filename: filename.into(),
            checksum: sha256_hex(sql.as_bytes()),
            sql,
        }
    }
}

/// An ordered set of migrations.
#[derive(Debug, Clone, Default)]
pub struct MigrationSet {
    migrations: Vec<Migration>,
}

impl MigrationSet {
    /// The crate's own schema.
    pub fn embedded() -> Self {
        Self::from_migrations(
            EMBEDDED
                .iter()
                .map(|(filename, sql)| Migration::new(*filename, *sql))
                .collect(),
        )
    }

    /// All `*.sql` files in `dir`. A missing directory yields an empty set.
    pub fn discover(dir: &Path) -> Result<Self, StorageError> {
        if !dir.exists() {
            return Ok(Self::default());
        }
        let source_err = |message: String| StorageError::MigrationSource {
            path: dir.display().to_string(),
            message,
        };

        let entries = std::fs::read_dir(dir).map_err(|e| source_err(e.to_string()))?;
        let mut migrations = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| source_err(e.to_string()))?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("sql") {
                continue;
            }
            let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let bytes = std::fs::read(&path).map_err(|e| StorageError::MigrationSource {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            let checksum = sha256_hex(&bytes);
            let sql = String::from_utf8(bytes).map_err(|e| StorageError::MigrationSource {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            migrations.push(Migration {
                filename: filename.to_string(),
                sql,
                checksum,
            });
        }
        Ok(Self::from_migrations(migrations))
    }

    /// Sorts by filename.
    pub fn from_migrations(mut migrations: Vec<Migration>) -> Self {
        migrations.sort_by(|a, b| a.filename.cmp(&b.filename));
        Self { migrations }
    }

    pub fn migrations(&self) -> &[Migration] {
        &self.migrations
    }

    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }
}

/// Result of [`status`].
#[derive(Debug, Clone)]
pub struct MigrationStatus {
    pub migrations: Vec<Migration>,
    pub applied: BTreeSet<String>,
}

impl MigrationStatus {
    pub fn pending(&self) -> Vec<&Migration> {
        self.migrations
            .iter()
            .filter(|m| !self.applied.contains(&m.filename))
            .collect()
    }
}

/// Apply the embedded schema.
pub fn run_migrations(conn: &Connection) -> Result<Vec<String>, StorageError> {
    apply(conn, &MigrationSet::embedded())
}

/// Apply every pending migration in `set`, returning the filenames applied.
///
/// All recorded checksums are verified before the first pending migration
/// runs. Each pending migration and its tracking row commit together; the
/// tracking row is re-read under the write lock, so a migration another
/// connection applied in the meantime is skipped rather than re-run.
pub fn apply(conn: &Connection, set: &MigrationSet) -> Result<Vec<String>, StorageError> {
    ensure_tracking_table(conn)?;
    let recorded = recorded_checksums(conn)?;

    for migration in set.migrations() {
        if let Some(existing) = recorded.get(&migration.filename) {
            verify_checksum(migration, existing)?;
        }
    }

    let mut applied = Vec::new();
    for migration in set.migrations() {
        if recorded.contains_key(&migration.filename) {
            continue;
        }
        let ran = with_immediate_transaction(conn, |tx| {
            if let Some(existing) = recorded_checksum(tx, &migration.filename)? {
                verify_checksum(migration, &existing)?;
                return Ok(false);
            }
            tx.execute_batch(&migration.sql)
                .map_err(|e| StorageError::MigrationFailed {
                    filename: migration.filename.clone(),
                    message: e.to_string(),
                })?;
            tx.execute(
                &format!("INSERT INTO {MIGRATION_TABLE} (filename, checksum) VALUES (?1, ?2)"),
                params![migration.filename, migration.checksum],
            )
            .map_err(|e| StorageError::MigrationFailed {
                filename: migration.filename.clone(),
                message: e.to_string(),
            })?;
            Ok::<_, StorageError>(true)
        })?;
        if ran {
            tracing::info!(filename = %migration.filename, "applied migration");
            applied.push(migration.filename.clone());
        } else {
            tracing::debug!(filename = %migration.filename, "migration applied concurrently");
        }
    }
    Ok(applied)
}

/// Every migration in `set` paired with the filenames already recorded.
pub fn status(conn: &Connection, set: &MigrationSet) -> Result<MigrationStatus, StorageError> {
    ensure_tracking_table(conn)?;
    let applied = recorded_checksums(conn)?.into_keys().collect();
    Ok(MigrationStatus {
        migrations: set.migrations().to_vec(),
        applied,
    })
}

fn ensure_tracking_table(conn: &Connection) -> Result<(), StorageError> {
    with_immediate_transaction(conn, |tx| {
        tx.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {MIGRATION_TABLE} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                filename TEXT NOT NULL UNIQUE,
                checksum TEXT NOT NULL,
                applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );"
        ))
        .map_err(to_storage_err)
    })
}

fn verify_checksum(migration: &Migration, recorded: &str) -> Result<(), StorageError> {
    if recorded == migration.checksum {
        return Ok(());
    }
    Err(StorageError::ChecksumMismatch {
        filename: migration.filename.clone(),
        recorded: recorded.to_string(),
        on_disk: migration.checksum.clone(),
    })
}

fn recorded_checksum(conn: &Connection, filename: &str) -> Result<Option<String>, StorageError> {
    conn.query_row(
        &format!("SELECT checksum FROM {MIGRATION_TABLE} WHERE filename = ?1"),
        params![filename],
        |row| row.get(0),
    )
    .optional()
    .map_err(to_storage_err)
}

fn recorded_checksums(conn: &Connection) -> Result<BTreeMap<String, String>, StorageError> {
    let mut stmt = conn
        .prepare(&format!("SELECT filename, checksum FROM {MIGRATION_TABLE}"))
        .map_err(to_storage_err)?;
    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
        .map_err(to_storage_err)?;
    rows.collect::<Result<BTreeMap<_, _>, _>>()
        .map_err(to_storage_err)
}
