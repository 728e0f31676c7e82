//! Tracing initialization and configuration.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;
use crate::constants::DEFAULT_LOG_FILTER;

/// Environment variable holding per-module log directives.
pub const LOG_ENV: &str = "SWFT_LOG";

/// Filter from `SWFT_LOG`, else `config_level`, else `swft=info`.
/// Unparsable directives fall through to the next source.
pub fn build_filter(config_level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(config_level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Install the global subscriber, e.g. with
/// `SWFT_LOG=swft_ingest=debug,swft_storage=warn`.
///
/// Returns false when a global subscriber was already installed, by an
/// earlier call or by the embedding application; that is not an error.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(build_filter(config.effective_level()))
        .try_init()
        .is_ok()
}
