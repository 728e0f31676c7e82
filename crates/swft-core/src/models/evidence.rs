//! Pipeline-run evidence models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvidenceKind {
    Sbom,
    Trivy,
    Signature,
}

impl EvidenceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sbom => "sbom",
            Self::Trivy => "trivy",
            Self::Signature => "signature",
        }
    }
}

impl fmt::Display for EvidenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvidenceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sbom" => Ok(Self::Sbom),
            "trivy" => Ok(Self::Trivy),
            "signature" => Ok(Self::Signature),
            other => Err(format!("unknown evidence kind '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SbomComponent {
    pub name: String,
    pub version: Option<String>,
    pub purl: Option<String>,
    pub licenses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrivyFinding {
    pub cve_id: String,
    pub severity: String,
    pub pkg: Option<String>,
    pub installed_version: Option<String>,
    pub fixed_version: Option<String>,
    pub artifact: Option<String>,
    pub path: Option<String>,
}

/// Signature verification payload. Only well-formedness is checked; digest
/// and verification outcome are supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignaturePayload {
    pub raw: Value,
}
