//! Server and dispatch configuration types.
//!
//! [`ServerConfig`] covers the HTTP listener; [`DispatchConfig`] covers how
//! operations are bound and answered. Both use the builder pattern.
//!
//! # Example
//!
//! ```rust
//! use inflector_server::{DispatchConfig, ServerConfig};
//! use std::time::Duration;
//!
//! let server = ServerConfig::builder()
//!     .http_addr("0.0.0.0:8080")
//!     .shutdown_timeout(Duration::from_secs(30))
//!     .build();
//! assert_eq!(server.http_addr(), "0.0.0.0:8080");
//!
//! let dispatch = DispatchConfig::builder()
//!     .controller_package("com.acme.controllers")
//!     .strict_signatures(true)
//!     .build();
//! assert!(dispatch.strict_signatures());
//! ```

use http::StatusCode;
use inflector_core::ModelNaming;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

/// Default HTTP bind address.
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8080";

/// Default shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Default maximum request body size (10 MiB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Default package qualifying controller names.
pub const DEFAULT_CONTROLLER_PACKAGE: &str = "io.swagger.sample.controllers";

/// Default package qualifying model type names.
pub const DEFAULT_MODEL_PACKAGE: &str = "io.swagger.sample.models";

/// HTTP listener configuration.
///
/// Use [`ServerConfig::builder()`] to construct instances.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP server bind address (e.g., "0.0.0.0:8080")
    http_addr: String,

    /// How long to wait for in-flight requests on shutdown
    shutdown_timeout: Duration,

    /// Largest request body accepted, in bytes
    max_body_size: usize,
}

impl ServerConfig {
    /// Creates a new server configuration builder.
    #[must_use]
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Returns the HTTP bind address.
    #[must_use]
    pub fn http_addr(&self) -> &str {
        &self.http_addr
    }

    /// Parses and returns the HTTP address as a `SocketAddr`.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be parsed.
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.http_addr.parse()
    }

    /// Returns the graceful shutdown timeout.
    #[must_use]
    pub fn shutdown_timeout(&self) -> Duration {
        self.shutdown_timeout
    }

    /// Returns the maximum request body size in bytes.
    #[must_use]
    pub fn max_body_size(&self) -> usize {
        self.max_body_size
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`ServerConfig`].
#[derive(Debug, Clone)]
pub struct ServerConfigBuilder {
    http_addr: String,
    shutdown_timeout: Duration,
    max_body_size: usize,
}

impl ServerConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            shutdown_timeout: Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }

    /// Sets the HTTP bind address.
    #[must_use]
    pub fn http_addr(mut self, addr: impl Into<String>) -> Self {
        self.http_addr = addr.into();
        self
    }

    /// Sets the graceful shutdown timeout.
    ///
    /// This is the maximum time the server waits for in-flight requests to
    /// complete during shutdown.
    #[must_use]
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Sets the maximum request body size in bytes.
    #[must_use]
    pub fn max_body_size(mut self, bytes: usize) -> Self {
        self.max_body_size = bytes;
        self
    }

    /// Builds the [`ServerConfig`].
    #[must_use]
    pub fn build(self) -> ServerConfig {
        ServerConfig {
            http_addr: self.http_addr,
            shutdown_timeout: self.shutdown_timeout,
            max_body_size: self.max_body_size,
        }
    }
}

impl Default for ServerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ServerConfig> for ServerConfigBuilder {
    fn from(config: ServerConfig) -> Self {
        Self {
            http_addr: config.http_addr,
            shutdown_timeout: config.shutdown_timeout,
            max_body_size: config.max_body_size,
        }
    }
}

/// How operations are bound and answered.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    controller_package: String,
    model_package: String,
    invalid_request_status: StatusCode,
    model_mappings: HashMap<String, String>,
    strict_signatures: bool,
    pretty_print: bool,
}

impl DispatchConfig {
    /// Creates a new dispatch configuration builder.
    #[must_use]
    pub fn builder() -> DispatchConfigBuilder {
        DispatchConfigBuilder::default()
    }

    /// Returns the package qualifying controller names.
    #[must_use]
    pub fn controller_package(&self) -> &str {
        &self.controller_package
    }

    /// Returns the package qualifying model type names.
    #[must_use]
    pub fn model_package(&self) -> &str {
        &self.model_package
    }

    /// Returns the status answered when required parameters are missing.
    #[must_use]
    pub fn invalid_request_status(&self) -> StatusCode {
        self.invalid_request_status
    }

    /// Returns the explicit model name to type name mappings.
    #[must_use]
    pub fn model_mappings(&self) -> &HashMap<String, String> {
        &self.model_mappings
    }

    /// Returns whether a signature mismatch aborts startup.
    #[must_use]
    pub fn strict_signatures(&self) -> bool {
        self.strict_signatures
    }

    /// Returns whether response bodies are pretty-printed.
    #[must_use]
    pub fn pretty_print(&self) -> bool {
        self.pretty_print
    }

    /// Returns the model naming convention for signature checks.
    #[must_use]
    pub fn model_naming(&self) -> ModelNaming {
        ModelNaming::new(self.model_package.clone(), self.model_mappings.clone())
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`DispatchConfig`].
#[derive(Debug, Clone)]
pub struct DispatchConfigBuilder {
    controller_package: String,
    model_package: String,
    invalid_request_status: StatusCode,
    model_mappings: HashMap<String, String>,
    strict_signatures: bool,
    pretty_print: bool,
}

impl DispatchConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            controller_package: DEFAULT_CONTROLLER_PACKAGE.to_string(),
            model_package: DEFAULT_MODEL_PACKAGE.to_string(),
            invalid_request_status: StatusCode::BAD_REQUEST,
            model_mappings: HashMap::new(),
            strict_signatures: false,
            pretty_print: false,
        }
    }

    /// Sets the package qualifying controller names.
    #[must_use]
    pub fn controller_package(mut self, package: impl Into<String>) -> Self {
        self.controller_package = package.into();
        self
    }

    /// Sets the package qualifying model type names.
    #[must_use]
    pub fn model_package(mut self, package: impl Into<String>) -> Self {
        self.model_package = package.into();
        self
    }

    /// Sets the status answered when required parameters are missing.
    #[must_use]
    pub fn invalid_request_status(mut self, status: StatusCode) -> Self {
        self.invalid_request_status = status;
        self
    }

    /// Maps a contract model name to a handler type name.
    #[must_use]
    pub fn model_mapping(mut self, model: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.model_mappings.insert(model.into(), type_name.into());
        self
    }

    /// Replaces all model mappings.
    #[must_use]
    pub fn model_mappings(mut self, mappings: HashMap<String, String>) -> Self {
        self.model_mappings = mappings;
        self
    }

    /// Makes signature mismatches a startup error.
    #[must_use]
    pub fn strict_signatures(mut self, strict: bool) -> Self {
        self.strict_signatures = strict;
        self
    }

    /// Enables pretty-printed response bodies.
    #[must_use]
    pub fn pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    /// Builds the [`DispatchConfig`].
    #[must_use]
    pub fn build(self) -> DispatchConfig {
        DispatchConfig {
            controller_package: self.controller_package,
            model_package: self.model_package,
            invalid_request_status: self.invalid_request_status,
            model_mappings: self.model_mappings,
            strict_signatures: self.strict_signatures,
            pretty_print: self.pretty_print,
        }
    }
}

impl Default for DispatchConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
