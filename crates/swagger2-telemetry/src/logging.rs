//! Structured logging with JSON or pretty output.
//!
//! Log lines go to stderr so command output on stdout stays machine-readable.

use crate::{LogFormat, TelemetryConfig, TelemetryError};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize the logging subsystem.
///
/// Sets up tracing-subscriber with either JSON or pretty format,
/// respecting the configured log level.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    // Build the env filter from config or RUST_LOG
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    match config.log_format {
        LogFormat::Json => init_json_logging(filter),
        LogFormat::Pretty => init_pretty_logging(filter),
    }
}

fn init_json_logging(filter: EnvFilter) -> Result<(), TelemetryError> {
    let json_layer = fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_current_span(true)
        .with_span_list(false)
        .with_file(false)
        .with_line_number(false)
        .flatten_event(true)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(json_layer)
        .try_init()
        .map_err(|e: tracing_subscriber::util::TryInitError| {
            TelemetryError::LoggingInit(e.to_string())
        })
}

fn init_pretty_logging(filter: EnvFilter) -> Result<(), TelemetryError> {
    let pretty_layer = fmt::layer()
        .pretty()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(pretty_layer)
        .try_init()
        .map_err(|e: tracing_subscriber::util::TryInitError| {
            TelemetryError::LoggingInit(e.to_string())
        })
}

/// Standard log event names.
pub mod events {
    /// A document file has been loaded and checked.
    pub const DOCUMENT_LOADED: &str = "document_loaded";

    /// A document has been compiled into route matchers and validators.
    pub const DOCUMENT_COMPILED: &str = "document_compiled";

    /// A request path matched no template (or more than one).
    pub const ROUTE_NOT_FOUND: &str = "route_not_found";

    /// The matched path declares no operation for the method.
    pub const METHOD_NOT_ALLOWED: &str = "method_not_allowed";

    /// Request or response validation failed.
    pub const VALIDATION_FAILURE: &str = "validation_failure";

    /// A JSON Schema could not be compiled; its validator rejects everything.
    pub const SCHEMA_COMPILE_FAILED: &str = "schema_compile_failed";
}

/// Helper macros for structured logging with standard fields.
///
/// These wrap the tracing macros to ensure consistent field naming.
#[macro_export]
macro_rules! log_document_loaded {
    ($($field:tt)*) => {
        tracing::info!(
            event = $crate::logging::events::DOCUMENT_LOADED,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_document_compiled {
    ($($field:tt)*) => {
        tracing::info!(
            event = $crate::logging::events::DOCUMENT_COMPILED,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_route_not_found {
    ($($field:tt)*) => {
        tracing::debug!(
            event = $crate::logging::events::ROUTE_NOT_FOUND,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_method_not_allowed {
    ($($field:tt)*) => {
        tracing::debug!(
            event = $crate::logging::events::METHOD_NOT_ALLOWED,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_validation_failure {
    ($($field:tt)*) => {
        tracing::debug!(
            event = $crate::logging::events::VALIDATION_FAILURE,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_schema_compile_failed {
    ($($field:tt)*) => {
        tracing::warn!(
            event = $crate::logging::events::SCHEMA_COMPILE_FAILED,
            $($field)*
        )
    };
}
