//! Normalized document models and persisted record types.

pub mod evidence;
pub mod oscal;
pub mod policy;
pub mod records;

pub use evidence::{EvidenceKind, SbomComponent, SignaturePayload, TrivyFinding};
pub use oscal::{CatalogControl, CatalogDocument, CatalogMetadata, ProfileDocument, ProfileMetadata};
pub use policy::{InitiativeDocument, InitiativePolicy, PolicyScope, PolicyStateEntry};
pub use records::{
    ArtifactKind, ControlParameter, EvidenceRecord, ProjectRecord, RunRecord, VersionRecord,
};
