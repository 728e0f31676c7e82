//! Observability for SWFT.
//! `tracing` crate with `EnvFilter`, per-module log levels.

pub mod setup;

pub use setup::{build_filter, init_tracing, LOG_ENV};
