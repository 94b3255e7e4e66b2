//! Structured logging for the Inflector contract dispatcher.
//!
//! Every Inflector crate logs through `tracing` macros. This crate installs
//! the subscriber that turns those events into output and defines the field
//! names shared by request log lines.
//!
//! | Level | Used for |
//! |-------|----------|
//! | `error` | Handler failures, contract load failures |
//! | `warn` | Signature mismatches, unused registrations |
//! | `info` | Startup, request completion |
//! | `debug` | Binding and decoding decisions |
//! | `trace` | Discarded coercions |
//!
//! # Example
//!
//! ```rust,ignore
//! use inflector_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::production())?;
//! ```

#![doc(html_root_url = "https://docs.rs/inflector-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, fields, init_logging, LogConfig, LogFormat};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
