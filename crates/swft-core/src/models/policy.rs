//! Azure Policy initiative and state models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativePolicy {
    pub policy_definition_id: String,
    pub reference_id: Option<String>,
    pub display_name: Option<String>,
    pub category: Option<String>,
    /// Upper-cased and trimmed.
    pub control_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeDocument {
    pub name: Option<String>,
    pub version: Option<String>,
    pub policies: Vec<InitiativePolicy>,
}

/// A single compliance observation with all five required fields present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyStateEntry {
    pub policy_definition_id: String,
    pub policy_assignment_id: String,
    pub resource_id: String,
    pub compliance_state: String,
    /// Raw timestamp as it appeared in the snapshot.
    pub last_evaluated: String,
}

/// Cloud the initiative was published for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyScope {
    Commercial,
    Gov,
}

impl PolicyScope {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Commercial => "commercial",
            Self::Gov => "gov",
        }
    }
}

impl fmt::Display for PolicyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyScope {
    type Err = String;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "commercial" => Ok(Self::Commercial),
            "gov" => Ok(Self::Gov),
            other => Err(format!("scope must be 'commercial' or 'gov', got '{other}'")),
        }
    }
}
