//! Rows persisted by the storage layer and handed back to callers.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::EvidenceKind;

/// Kinds of authority documents tracked by the version registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Catalog,
    Baseline,
    PolicyInitiative,
}

impl ArtifactKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Catalog => "catalog",
            Self::Baseline => "baseline",
            Self::PolicyInitiative => "policy_initiative",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pinned `(kind, name)` authority document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    pub id: i64,
    pub kind: String,
    pub name: String,
    pub version_label: String,
    pub content_hash: String,
    pub source_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: i64,
    pub key: String,
    pub services: Vec<String>,
    pub regions: Vec<String>,
    pub boundary_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub id: i64,
    pub project_fk: i64,
    pub run_id: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceRecord {
    pub id: i64,
    pub kind: EvidenceKind,
    pub file_path: PathBuf,
    pub content_hash: String,
    pub size_bytes: i64,
    pub collected_at: String,
    pub run_fk: i64,
    pub run_id: String,
}

/// A catalog control parameter, optionally carrying a project's value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlParameter {
    pub control_id: String,
    pub param_id: String,
    pub label: Option<String>,
    pub description: Option<String>,
    pub values: Vec<String>,
    pub current_value: Option<String>,
}
