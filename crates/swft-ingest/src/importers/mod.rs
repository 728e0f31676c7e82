//! One importer per authority document kind.
//!
//! Every importer parses first, then pins, then runs the registry check and
//! its kind-specific writes in a single transaction. A parse failure leaves
//! no pin behind; a conflict or write failure leaves only the (harmless,
//! content-addressed) pin.

pub mod baseline;
pub mod catalog;
pub mod policy_initiative;
pub mod policy_state;

use swft_core::errors::IngestError;

pub use baseline::{BaselineImportResult, BaselineImporter};
pub use catalog::{CatalogImportResult, CatalogImporter};
pub use policy_initiative::{InitiativeImportResult, PolicyInitiativeImporter};
pub use policy_state::{PolicyStateImportResult, PolicyStateImporter};

use crate::pinning::PinnedFile;

/// Registry `source_uri` for a pin.
pub(crate) fn source_uri(pin: &PinnedFile) -> String {
    pin.path.display().to_string()
}

/// Logical names key the registry; they must carry something.
pub(crate) fn require_name<'a>(field: &str, name: &'a str) -> Result<&'a str, IngestError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(IngestError::invalid(field, "must not be empty"));
    }
    Ok(trimmed)
}
