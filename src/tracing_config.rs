//! Tracing setup for `rebindc`.
//!
//! Nothing is installed unless `REBINDC_LOG` (or `RUST_LOG`) is set:
//!
//! ```bash
//! # Per-unit verdicts
//! REBINDC_LOG=debug rebindc check model.json
//!
//! # Every contract and mismatch, one JSON object per event
//! REBINDC_LOG=rebindc::rebind=trace REBINDC_LOG_FORMAT=json rebindc check model.json
//! ```
//!
//! Output always goes to stderr, next to the diagnostics.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

pub const LOG_ENV: &str = "REBINDC_LOG";
pub const LOG_FORMAT_ENV: &str = "REBINDC_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    /// Newline-delimited JSON objects.
    Json,
}

impl LogFormat {
    /// Anything but `json` (any case) is text.
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var(LOG_FORMAT_ENV).unwrap_or_default())
    }
}

/// `REBINDC_LOG` wins over `RUST_LOG`.
fn build_filter() -> EnvFilter {
    match std::env::var(LOG_ENV) {
        Ok(val) => EnvFilter::builder().parse_lossy(val),
        Err(_) => EnvFilter::from_default_env(),
    }
}

/// Install the global subscriber if logging was requested. Safe to call more
/// than once; later calls leave the first subscriber in place.
pub fn init_tracing() {
    if std::env::var(LOG_ENV).is_err() && std::env::var("RUST_LOG").is_err() {
        return;
    }

    let filter = build_filter();
    let installed = match LogFormat::from_env() {
        LogFormat::Json => {
            let layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(layer).try_init()
        }
        LogFormat::Text => {
            let layer = fmt::layer().with_target(true).with_writer(std::io::stderr);
            Registry::default().with(filter).with(layer).try_init()
        }
    };
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
