//! OSCAL catalog and profile models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Title/version metadata shared by catalogs and profiles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogMetadata {
    pub title: Option<String>,
    pub version: Option<String>,
    pub oscal_version: Option<String>,
}

impl CatalogMetadata {
    /// Label recorded in the version registry: document version, then OSCAL
    /// version, then the caller's logical name.
    pub fn version_label(&self, fallback: &str) -> String {
        self.version
            .clone()
            .or_else(|| self.oscal_version.clone())
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// One control node from a catalog, sub-controls flattened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogControl {
    pub control_id: String,
    pub family: Option<String>,
    pub title: Option<String>,
    pub parameters: Vec<Value>,
    pub assessment_objectives: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub metadata: CatalogMetadata,
    pub controls: Vec<CatalogControl>,
}

/// Profiles carry the same metadata block as catalogs.
pub type ProfileMetadata = CatalogMetadata;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileDocument {
    pub metadata: ProfileMetadata,
    /// Sorted, deduplicated.
    pub control_ids: Vec<String>,
}
