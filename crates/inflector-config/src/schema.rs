//! Configuration sections.

use std::collections::HashMap;

use inflector_server::{
    DEFAULT_CONTROLLER_PACKAGE, DEFAULT_HTTP_ADDR, DEFAULT_MAX_BODY_SIZE, DEFAULT_MODEL_PACKAGE,
    DEFAULT_SHUTDOWN_TIMEOUT_SECS,
};
use inflector_telemetry::LogFormat;
use serde::{Deserialize, Serialize};

/// HTTP listener section.
///
/// ```
/// use inflector_config::ServerSettings;
///
/// let settings = ServerSettings::default();
/// assert_eq!(settings.http_addr, "0.0.0.0:8080");
/// assert_eq!(settings.shutdown_timeout_secs, 30);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSettings {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub http_addr: String,

    /// Largest accepted request body, in bytes.
    pub max_body_size: usize,

    /// Graceful shutdown timeout in seconds.
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            shutdown_timeout_secs: DEFAULT_SHUTDOWN_TIMEOUT_SECS,
        }
    }
}

/// Contract and binding section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchSettings {
    /// Location of the Swagger 2.0 document.
    pub swagger_url: String,

    /// Package that qualifies controller names.
    pub controller_package: String,

    /// Package that qualifies model type names.
    pub model_package: String,

    /// Status answered when required parameters are missing.
    pub invalid_request_status_code: u16,

    /// Model name to type name overrides.
    pub model_mappings: HashMap<String, String>,

    /// Treat handler signature mismatches as startup errors.
    pub strict_signatures: bool,

    /// Pretty-print JSON responses.
    pub pretty_print: bool,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            swagger_url: "swagger.yaml".to_string(),
            controller_package: DEFAULT_CONTROLLER_PACKAGE.to_string(),
            model_package: DEFAULT_MODEL_PACKAGE.to_string(),
            invalid_request_status_code: 400,
            model_mappings: HashMap::new(),
            strict_signatures: false,
            pretty_print: false,
        }
    }
}

/// Logging section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSettings {
    /// Enable log output.
    pub enabled: bool,

    /// Level filter (`trace`, `debug`, `info`, `warn`, `error`).
    pub level: String,

    /// Output format.
    pub format: LogFormat,

    /// Include the event target.
    pub include_target: bool,

    /// Include source file and line.
    pub include_file_line: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            format: LogFormat::Json,
            include_target: true,
            include_file_line: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_section_keeps_defaults() {
        let settings: DispatchSettings =
            serde_json::from_str(r#"{ "strict_signatures": true }"#).expect("valid section");
        assert!(settings.strict_signatures);
        assert_eq!(settings.invalid_request_status_code, 400);
        assert_eq!(settings.swagger_url, "swagger.yaml");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<ServerSettings, _> = serde_json::from_str(r#"{ "port": 80 }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_log_format_names() {
        let settings: LoggingSettings =
            serde_json::from_str(r#"{ "format": "compact" }"#).expect("valid section");
        assert_eq!(settings.format, LogFormat::Compact);
    }
}
