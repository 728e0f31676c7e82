//! Query modules, one per table group.
//! Free functions over `&Connection`; callers own the transaction.

pub mod baselines;
pub mod catalog;
pub mod evidence;
pub mod parameters;
pub mod policies;
pub mod projects;
pub mod runs;
pub mod version_registry;
