//! Tests for log filter resolution and subscriber installation.

use std::sync::Mutex;

use swft_core::config::{LoggingConfig, SwftConfig};
use swft_core::tracing::{build_filter, init_tracing, LOG_ENV};

static ENV_MUTEX: Mutex<()> = Mutex::new(());

#[test]
fn env_directives_win_over_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    std::env::set_var(LOG_ENV, "swft_storage=trace");
    let filter = build_filter("swft_ingest=debug").to_string();
    std::env::remove_var(LOG_ENV);

    assert!(filter.contains("swft_storage=trace"), "{filter}");
    assert!(!filter.contains("swft_ingest"), "{filter}");
}

#[test]
fn config_level_applies_without_env() {
    let _lock = ENV_MUTEX.lock().unwrap();
    std::env::remove_var(LOG_ENV);

    let config = SwftConfig::from_toml("[logging]\nlevel = \"swft_ingest=debug\"\n").unwrap();
    assert_eq!(config.logging.effective_level(), "swft_ingest=debug");
    assert!(build_filter(config.logging.effective_level())
        .to_string()
        .contains("swft_ingest=debug"));
}

#[test]
fn blank_level_uses_default() {
    let config = LoggingConfig {
        level: Some("  ".into()),
    };
    assert_eq!(config.effective_level(), "swft=info");
    assert_eq!(LoggingConfig::default().effective_level(), "swft=info");
}

#[test]
fn second_init_is_harmless() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let config = LoggingConfig::default();
    assert!(init_tracing(&config));
    assert!(!init_tracing(&config));
    tracing::info!("subscriber installed");
}
