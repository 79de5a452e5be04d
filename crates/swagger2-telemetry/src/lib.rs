//! Logging infrastructure for swagger2.
//!
//! This crate provides:
//! - Structured JSON or pretty logging on stderr
//! - Standard event names and `log_*!` macros used by the library crates
//!
//! # Usage
//!
//! ```ignore
//! use swagger2_telemetry::{Telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::new().with_log_level("debug");
//! let telemetry = Telemetry::init(config)?;
//! ```

pub mod config;
pub mod logging;

pub use config::{LogFormat, TelemetryConfig};
pub use logging::events;

use thiserror::Error;

/// Telemetry errors.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Failed to initialize logging.
    #[error("failed to initialize logging: {0}")]
    LoggingInit(String),
}

/// Main telemetry handle.
pub struct Telemetry {
    config: TelemetryConfig,
}

impl Telemetry {
    /// Initialize structured logging with the given configuration.
    pub fn init(config: TelemetryConfig) -> Result<Self, TelemetryError> {
        logging::init_logging(&config)?;
        tracing::debug!(
            service = %config.service_name,
            level = %config.log_level,
            "logging initialized"
        );
        Ok(Self { config })
    }

    /// Get the telemetry configuration.
    pub fn config(&self) -> &TelemetryConfig {
        &self.config
    }
}
