//! Configuration system for SWFT.
//! TOML-based, layered resolution: CLI > env > config file > defaults.

pub mod database_config;
pub mod logging_config;
pub mod paths_config;
pub mod swft_config;

pub use database_config::DatabaseConfig;
pub use logging_config::LoggingConfig;
pub use paths_config::PathsConfig;
pub use swft_config::{CliOverrides, SwftConfig};
