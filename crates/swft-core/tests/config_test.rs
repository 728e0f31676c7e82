//! Tests for the SWFT configuration system.

use std::path::PathBuf;
use std::sync::Mutex;

use swft_core::config::swft_config::{CliOverrides, SwftConfig, ENV_VARS};
use swft_core::errors::ConfigError;

/// Global mutex to serialize tests that modify environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn tempdir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

fn clear_swft_env_vars() {
    for key in ENV_VARS {
        std::env::remove_var(key);
    }
}

#[test]
fn test_layered_resolution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_swft_env_vars();

    let dir = tempdir();
    let file = dir.path().join("swft.toml");
    std::fs::write(
        &file,
        r#"
[paths]
home = "/from/file"
pinned = "/file/pinned"

[database]
busy_timeout_ms = 1000
"#,
    )
    .unwrap();

    std::env::set_var("SWFT_PINNED", "/env/pinned");
    std::env::set_var("SWFT_DB_TIMEOUT", "2500");

    let cli = CliOverrides {
        home: Some(PathBuf::from("/from/cli")),
        ..Default::default()
    };
    let config = SwftConfig::load(Some(&file), Some(&cli)).unwrap();

    assert_eq!(config.paths.home, Some(PathBuf::from("/from/cli")));
    assert_eq!(config.paths.pinned, Some(PathBuf::from("/env/pinned")));
    assert_eq!(config.database.busy_timeout_ms, Some(2500));
    // Unset values derive from the effective home.
    assert_eq!(config.paths.effective_store(), PathBuf::from("/from/cli/store"));
    assert_eq!(config.effective_db_path(), PathBuf::from("/from/cli/swft.db"));

    clear_swft_env_vars();
}

#[test]
fn test_explicit_missing_file_is_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_swft_env_vars();

    let dir = tempdir();
    let result = SwftConfig::load(Some(&dir.path().join("absent.toml")), None);
    assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
}

#[test]
fn test_invalid_toml_syntax() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_swft_env_vars();

    let dir = tempdir();
    let file = dir.path().join("swft.toml");
    std::fs::write(&file, "this is not valid toml {{{{").unwrap();

    match SwftConfig::load(Some(&file), None) {
        Err(ConfigError::ParseError { .. }) => {}
        other => panic!("Expected ParseError, got: {:?}", other),
    }
}

#[test]
fn test_unparsable_env_timeout_is_ignored() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_swft_env_vars();

    let dir = tempdir();
    let file = dir.path().join("swft.toml");
    std::fs::write(&file, "[database]\nbusy_timeout_ms = 750\n").unwrap();
    std::env::set_var("SWFT_DB_TIMEOUT", "soon");

    let config = SwftConfig::load(Some(&file), None).unwrap();
    assert_eq!(config.database.effective_busy_timeout_ms(), 750);

    clear_swft_env_vars();
}

#[test]
fn test_validation_rejects_zero_values() {
    let result = SwftConfig::from_toml("[database]\nbusy_timeout_ms = 0\n");
    match result {
        Err(ConfigError::ValidationFailed { field, .. }) => {
            assert_eq!(field, "database.busy_timeout_ms");
        }
        other => panic!("Expected ValidationFailed, got: {:?}", other),
    }

    assert!(matches!(
        SwftConfig::from_toml("[database]\nread_pool_size = 0\n"),
        Err(ConfigError::ValidationFailed { .. })
    ));
}

#[test]
fn test_defaults_and_clamping() {
    let config = SwftConfig::from_toml("").unwrap();
    assert_eq!(config.database.effective_busy_timeout_ms(), 5000);
    assert_eq!(config.database.effective_read_pool_size(), 4);

    let config = SwftConfig::from_toml("[database]\nread_pool_size = 64\n").unwrap();
    assert_eq!(config.database.effective_read_pool_size(), 8);
}

#[test]
fn test_with_home_and_ensure() {
    let dir = tempdir();
    let config = SwftConfig::with_home(dir.path().join("swft"));
    config.paths.ensure().unwrap();

    assert!(config.paths.effective_pinned().is_dir());
    assert!(config.paths.effective_store().is_dir());
    assert!(config.paths.effective_outputs().is_dir());
    assert_eq!(config.paths.effective_pinned(), dir.path().join("swft/pinned"));
}

#[test]
fn test_toml_roundtrip_preserves_values() {
    let config = SwftConfig::from_toml(
        "[paths]\nhome = \"/srv/swft\"\n\n[database]\nread_pool_size = 2\n",
    )
    .unwrap();
    let back = SwftConfig::from_toml(&config.to_toml().unwrap()).unwrap();
    assert_eq!(back, config);
}
