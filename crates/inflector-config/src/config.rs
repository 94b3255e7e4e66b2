//! The root configuration type.

use std::time::Duration;

use http::StatusCode;
use inflector_server::{DispatchConfig, ServerConfig};
use inflector_telemetry::{LogConfig, LogFormat};
use serde::{Deserialize, Serialize};

use crate::{ConfigError, DispatchSettings, LoggingSettings, ServerSettings};

/// Complete Inflector configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and the
/// environment.
///
/// # Example
///
/// ```
/// use inflector_config::InflectorConfig;
///
/// let config = InflectorConfig::default();
/// assert_eq!(config.server.http_addr, "0.0.0.0:8080");
/// assert_eq!(config.dispatch.swagger_url, "swagger.yaml");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default, deny_unknown_fields)]
pub struct InflectorConfig {
    /// HTTP listener settings.
    pub server: ServerSettings,

    /// Contract and binding settings.
    pub dispatch: DispatchSettings,

    /// Logging settings.
    pub logging: LoggingSettings,
}

impl InflectorConfig {
    /// Creates a preset for local development: debug level, pretty logs and
    /// pretty-printed JSON.
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config.logging.include_file_line = true;
        config.dispatch.pretty_print = true;
        config
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if:
    /// - `server.http_addr` is not a socket address
    /// - `server.max_body_size` is zero
    /// - `dispatch.swagger_url` is empty
    /// - `dispatch.invalid_request_status_code` is outside 400..=499
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self
            .server
            .http_addr
            .parse::<std::net::SocketAddr>()
            .is_err()
        {
            return Err(ConfigError::invalid_value(
                "server.http_addr",
                format!("invalid socket address: {}", self.server.http_addr),
            ));
        }

        if self.server.max_body_size == 0 {
            return Err(ConfigError::invalid_value(
                "server.max_body_size",
                "must be greater than zero",
            ));
        }

        if self.dispatch.swagger_url.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "dispatch.swagger_url",
                "must not be empty",
            ));
        }

        if !(400..=499).contains(&self.dispatch.invalid_request_status_code) {
            return Err(ConfigError::invalid_value(
                "dispatch.invalid_request_status_code",
                format!(
                    "must be a client error status (400-499), got {}",
                    self.dispatch.invalid_request_status_code
                ),
            ));
        }

        Ok(())
    }

    /// Returns the listener configuration.
    #[must_use]
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig::builder()
            .http_addr(self.server.http_addr.clone())
            .max_body_size(self.server.max_body_size)
            .shutdown_timeout(Duration::from_secs(self.server.shutdown_timeout_secs))
            .build()
    }

    /// Returns the dispatch configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the invalid request status is
    /// not a valid status code.
    pub fn dispatch_config(&self) -> Result<DispatchConfig, ConfigError> {
        let status = StatusCode::from_u16(self.dispatch.invalid_request_status_code)
            .map_err(|e| {
                ConfigError::invalid_value("dispatch.invalid_request_status_code", e.to_string())
            })?;

        Ok(DispatchConfig::builder()
            .controller_package(self.dispatch.controller_package.clone())
            .model_package(self.dispatch.model_package.clone())
            .invalid_request_status(status)
            .model_mappings(self.dispatch.model_mappings.clone())
            .strict_signatures(self.dispatch.strict_signatures)
            .pretty_print(self.dispatch.pretty_print)
            .build())
    }

    /// Returns the logging configuration.
    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            enabled: self.logging.enabled,
            level: self.logging.level.clone(),
            format: self.logging.format,
            include_target: self.logging.include_target,
            include_file_line: self.logging.include_file_line,
            ..LogConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Validation Tests ====================

    #[test]
    fn test_default_is_valid() {
        assert!(InflectorConfig::default().validate().is_ok());
        assert!(InflectorConfig::development().validate().is_ok());
    }

    #[test]
    fn test_invalid_address() {
        let mut config = InflectorConfig::default();
        config.server.http_addr = "localhost".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "server.http_addr"
        ));
    }

    #[test]
    fn test_invalid_request_status_must_be_client_error() {
        let mut config = InflectorConfig::default();
        config.dispatch.invalid_request_status_code = 500;
        assert!(config.validate().is_err());

        config.dispatch.invalid_request_status_code = 422;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_swagger_url() {
        let mut config = InflectorConfig::default();
        config.dispatch.swagger_url = "  ".to_string();
        assert!(config.validate().is_err());
    }

    // ==================== Conversion Tests ====================

    #[test]
    fn test_server_config() {
        let mut config = InflectorConfig::default();
        config.server.http_addr = "127.0.0.1:9000".to_string();
        config.server.shutdown_timeout_secs = 5;

        let server = config.server_config();
        assert_eq!(server.http_addr(), "127.0.0.1:9000");
        assert_eq!(server.shutdown_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_dispatch_config() {
        let mut config = InflectorConfig::default();
        config.dispatch.invalid_request_status_code = 422;
        config.dispatch.strict_signatures = true;
        config
            .dispatch
            .model_mappings
            .insert("Pet".to_string(), "acme.Animal".to_string());

        let dispatch = config.dispatch_config().expect("valid dispatch config");
        assert_eq!(dispatch.invalid_request_status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(dispatch.strict_signatures());
        assert_eq!(dispatch.model_naming().type_name("Pet"), "acme.Animal");
    }

    #[test]
    fn test_log_config() {
        let log = InflectorConfig::development().log_config();
        assert_eq!(log.level, "debug");
        assert_eq!(log.format, LogFormat::Pretty);
        assert_eq!(log.service_name, "inflector");
    }
}
