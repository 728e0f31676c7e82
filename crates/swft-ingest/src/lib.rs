//! # swft-ingest
//!
//! The artifact versioning and ingestion pipeline: content pinning, pure
//! document parsers, per-kind importers, evidence ingestion, project and
//! parameter stores, authority-document sources, and the
//! [`ComplianceService`] facade tying them to one configuration and one
//! database.

pub mod evidence;
pub mod importers;
pub mod parameters;
pub mod parsers;
pub mod pinning;
pub mod projects;
pub mod service;
pub mod sources;
pub mod validation;

pub use evidence::{EvidenceIngestResult, EvidenceManager};
pub use importers::{
    BaselineImportResult, CatalogImportResult, InitiativeImportResult, PolicyStateImportResult,
};
pub use pinning::{pin_source_file, PinnedFile};
pub use projects::ProjectInput;
pub use service::{ComplianceService, SyncResult};
