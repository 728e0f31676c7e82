//! Top-level SWFT configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{DatabaseConfig, LoggingConfig, PathsConfig};
use crate::errors::ConfigError;

/// File consulted when no explicit config path is given.
pub const DEFAULT_CONFIG_FILE: &str = "swft.toml";

/// Environment variables read by [`SwftConfig::load`].
pub const ENV_VARS: [&str; 7] = [
    "SWFT_HOME",
    "SWFT_STORE",
    "SWFT_PINNED",
    "SWFT_OUTPUTS",
    "SWFT_DB_PATH",
    "SWFT_DB_TIMEOUT",
    "SWFT_LOG_LEVEL",
];

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`SWFT_*`)
/// 3. Config file (explicit path, else `./swft.toml` when present)
/// 4. Compiled defaults
///
/// Constructed explicitly and handed to every component; nothing caches it.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct SwftConfig {
    pub paths: PathsConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub home: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
}

impl SwftConfig {
    /// Load configuration with layered resolution.
    pub fn load(
        config_path: Option<&Path>,
        cli_overrides: Option<&CliOverrides>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::FileNotFound {
                        path: path.display().to_string(),
                    });
                }
                Self::merge_toml_file(&mut config, path)?;
            }
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::merge_toml_file(&mut config, default)?;
                }
            }
        }

        Self::apply_env_overrides(&mut config);

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Config rooted at `home`, everything else defaulted beneath it.
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        Self {
            paths: PathsConfig {
                home: Some(home.into()),
                ..Default::default()
            },
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Validate the configuration values.
    pub fn validate(config: &SwftConfig) -> Result<(), ConfigError> {
        if config.database.busy_timeout_ms == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "database.busy_timeout_ms".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.database.read_pool_size == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "database.read_pool_size".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Database file, defaulting beneath the home directory.
    pub fn effective_db_path(&self) -> PathBuf {
        self.database
            .path
            .clone()
            .unwrap_or_else(|| self.paths.effective_home().join("swft.db"))
    }

    fn merge_toml_file(config: &mut SwftConfig, path: &Path) -> Result<(), ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
                path: path.display().to_string(),
            })?;

        let file_config: SwftConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `Some` values in `other` win.
    fn merge(base: &mut SwftConfig, other: &SwftConfig) {
        if other.paths.home.is_some() {
            base.paths.home = other.paths.home.clone();
        }
        if other.paths.store.is_some() {
            base.paths.store = other.paths.store.clone();
        }
        if other.paths.pinned.is_some() {
            base.paths.pinned = other.paths.pinned.clone();
        }
        if other.paths.outputs.is_some() {
            base.paths.outputs = other.paths.outputs.clone();
        }
        if other.database.path.is_some() {
            base.database.path = other.database.path.clone();
        }
        if other.database.busy_timeout_ms.is_some() {
            base.database.busy_timeout_ms = other.database.busy_timeout_ms;
        }
        if other.database.read_pool_size.is_some() {
            base.database.read_pool_size = other.database.read_pool_size;
        }
        if other.logging.level.is_some() {
            base.logging.level = other.logging.level.clone();
        }
    }

    fn apply_env_overrides(config: &mut SwftConfig) {
        if let Some(v) = env_path("SWFT_HOME") {
            config.paths.home = Some(v);
        }
        if let Some(v) = env_path("SWFT_STORE") {
            config.paths.store = Some(v);
        }
        if let Some(v) = env_path("SWFT_PINNED") {
            config.paths.pinned = Some(v);
        }
        if let Some(v) = env_path("SWFT_OUTPUTS") {
            config.paths.outputs = Some(v);
        }
        if let Some(v) = env_path("SWFT_DB_PATH") {
            config.database.path = Some(v);
        }
        if let Ok(val) = std::env::var("SWFT_DB_TIMEOUT") {
            if let Ok(v) = val.parse::<u64>() {
                config.database.busy_timeout_ms = Some(v);
            }
        }
        if let Ok(level) = std::env::var("SWFT_LOG_LEVEL") {
            if !level.is_empty() {
                config.logging.level = Some(level);
            }
        }
    }

    fn apply_cli_overrides(config: &mut SwftConfig, cli: &CliOverrides) {
        if let Some(ref v) = cli.home {
            config.paths.home = Some(v.clone());
        }
        if let Some(ref v) = cli.db_path {
            config.database.path = Some(v.clone());
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
