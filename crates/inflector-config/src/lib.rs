//! Typed configuration for Inflector.
//!
//! - TOML, JSON and YAML configuration files
//! - `.env` files and environment variable overrides
//! - Strict parsing (unknown fields are errors)
//! - Layered loading (defaults → files → environment)
//!
//! # Example
//!
//! ```no_run
//! use inflector_config::{ConfigLoader, ENV_PREFIX};
//!
//! # fn main() -> Result<(), inflector_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_optional_file("inflector.yaml")?
//!     .with_dotenv()?
//!     .with_env_prefix(ENV_PREFIX)
//!     .load()?;
//!
//! println!("Serving {} on {}", config.dispatch.swagger_url, config.server.http_addr);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```yaml
//! server:
//!   http_addr: 0.0.0.0:8080
//!   max_body_size: 10485760
//!   shutdown_timeout_secs: 30
//!
//! dispatch:
//!   swagger_url: swagger.yaml
//!   controller_package: io.swagger.sample.controllers
//!   model_package: io.swagger.sample.models
//!   invalid_request_status_code: 400
//!   strict_signatures: false
//!   pretty_print: false
//!   model_mappings:
//!     Pet: com.acme.Animal
//!
//! logging:
//!   level: info
//!   format: json
//! ```
//!
//! # Environment Variable Overrides
//!
//! - `INFLECTOR__SERVER__HTTP_ADDR=0.0.0.0:9000`
//! - `INFLECTOR__DISPATCH__INVALID_REQUEST_STATUS_CODE=422`
//! - `INFLECTOR__LOGGING__LEVEL=debug`

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::InflectorConfig;
pub use error::ConfigError;
pub use loader::{ConfigLoader, ENV_PREFIX};
pub use schema::{DispatchSettings, LoggingSettings, ServerSettings};
