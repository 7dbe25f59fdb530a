//! Monarch - Unit Economics Cost Engine
//!
//! Normalizes heterogeneous cost components (usage-based, recurring, one-off)
//! into a comparable monthly figure, aggregates them per scenario and compares
//! scenarios side by side.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

use tracing_subscriber::{fmt, prelude::*, util::TryInitError, EnvFilter};

use crate::config::LoggingConfig;

/// Initialize tracing with `RUST_LOG`, defaulting to `info`.
///
/// Panics if a global subscriber is already installed.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();
}

/// Initialize tracing from configuration.
///
/// `RUST_LOG` still wins over the configured level when set.
pub fn init_tracing_with(config: &LoggingConfig) -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let (plain, json) = if config.json {
        (None, Some(fmt::layer().json().with_target(true)))
    } else {
        (Some(fmt::layer().with_target(true)), None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(plain)
        .with(json)
        .try_init()
}
