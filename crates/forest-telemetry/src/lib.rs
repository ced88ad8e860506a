//! # Forest Telemetry
//!
//! Logging bootstrap for binaries and test harnesses built on the forest
//! crates. Library crates only emit `tracing` events; this crate decides
//! where they go.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use forest_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _guard = init_telemetry(TelemetryConfig::from_env())?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `FOREST_SERVICE_NAME` | `forest` | Service name on the startup event |
//! | `FOREST_LOG_LEVEL` | `info` | Filter directive, falls back to `RUST_LOG` |
//! | `FOREST_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `FOREST_JSON_LOGS` | `false` | JSON lines instead of pretty output |

mod config;
mod logging;

pub use config::{TelemetryConfig, DEFAULT_SERVICE_NAME};
pub use logging::{env_filter, init_logging, LoggingGuard};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("invalid log filter {directive:?}: {reason}")]
    Filter { directive: String, reason: String },

    #[error("a global subscriber is already installed: {0}")]
    AlreadyInitialized(String),
}

/// Initialize logging from `config`.
///
/// Hold the returned guard for the lifetime of the process.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let logging = init_logging(&config)?;
    Ok(TelemetryGuard { _logging: logging })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    _logging: LoggingGuard,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("shutting down telemetry");
    }
}
