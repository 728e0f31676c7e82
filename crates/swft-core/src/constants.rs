//! Shared constants for the SWFT compliance backend.

/// SWFT version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Read buffer used when hashing files (1 MiB).
pub const HASH_BUFFER_SIZE: usize = 1024 * 1024;

/// Number of hex digits of the content hash embedded in pinned filenames.
pub const PINNED_HASH_PREFIX_LEN: usize = 12;

/// Extension used for pinned files whose source has none.
pub const DEFAULT_PINNED_EXTENSION: &str = ".json";

/// Name of the migration tracking table.
pub const MIGRATION_TABLE: &str = "swft_schema_migrations";

/// Default SQLite busy timeout in milliseconds.
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

/// Default number of read connections.
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

/// Maximum number of read connections.
pub const MAX_READ_POOL_SIZE: usize = 8;

// ---- Pin categories ----

pub const PIN_CATEGORY_CATALOGS: &str = "catalogs";
pub const PIN_CATEGORY_BASELINES: &str = "baselines";
pub const PIN_CATEGORY_POLICY_INITIATIVES: &str = "policy_initiatives";
pub const PIN_CATEGORY_EVIDENCE: &str = "evidence";

/// Ownership recorded on implemented-requirement placeholders.
pub const DEFAULT_REQUIREMENT_OWNERSHIP: &str = "Customer";

/// Status recorded on implemented-requirement placeholders.
pub const DEFAULT_REQUIREMENT_STATUS: &str = "Partial";

/// Log filter used when neither `SWFT_LOG` nor `[logging] level` is set.
pub const DEFAULT_LOG_FILTER: &str = "swft=info";
