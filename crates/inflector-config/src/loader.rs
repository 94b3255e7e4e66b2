//! Layered configuration loading.
//!
//! Layers apply in order, later ones overriding earlier ones:
//! 1. Defaults (or a preset)
//! 2. Configuration files (TOML, JSON or YAML), merged key by key
//! 3. Environment variables named `INFLECTOR__SECTION__KEY`
//!
//! Every layer is merged as a JSON tree and re-read into
//! [`InflectorConfig`], so unknown keys are rejected wherever they come from.

use std::env;
use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::{ConfigError, InflectorConfig};

/// Default environment variable prefix.
pub const ENV_PREFIX: &str = "INFLECTOR";

/// Configuration loader.
///
/// # Example
///
/// ```no_run
/// use inflector_config::ConfigLoader;
///
/// # fn main() -> Result<(), inflector_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_file("inflector.yaml")?
///     .with_dotenv()?
///     .with_env_prefix("INFLECTOR")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    tree: Value,
    env_prefix: Option<String>,
    env_vars: Option<Vec<(String, String)>>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a loader starting from defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&InflectorConfig::default())
    }

    /// Starts from the development preset.
    ///
    /// ```
    /// use inflector_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new().with_development().load().unwrap();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn with_development(self) -> Self {
        Self {
            tree: to_tree(&InflectorConfig::development()),
            ..self
        }
    }

    fn from_config(config: &InflectorConfig) -> Self {
        Self {
            tree: to_tree(config),
            env_prefix: None,
            env_vars: None,
        }
    }

    /// Merges a configuration file.
    ///
    /// The format follows the extension: `.toml`, `.json`, `.yaml` or `.yml`.
    pub fn with_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.display().to_string()))?;
        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;

        tracing::debug!(path = %path.display(), "Loading configuration file");
        self.merge(parse_tree(&content, &format)?, &path.display().to_string())
    }

    /// Merges a configuration file if it exists.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Merges configuration text in the named format.
    ///
    /// ```
    /// use inflector_config::ConfigLoader;
    ///
    /// let toml = r#"
    ///     [dispatch]
    ///     swagger_url = "petstore.json"
    /// "#;
    ///
    /// let config = ConfigLoader::new().with_string(toml, "toml").unwrap().load().unwrap();
    /// assert_eq!(config.dispatch.swagger_url, "petstore.json");
    /// assert_eq!(config.server.http_addr, "0.0.0.0:8080");
    /// ```
    pub fn with_string(self, content: &str, format: &str) -> Result<Self, ConfigError> {
        let tree = parse_tree(content, &format.to_lowercase())?;
        self.merge(tree, "inline configuration")
    }

    /// Loads variables from a `.env` file in the working directory, if any.
    ///
    /// Variables already set in the process environment are kept.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => {
                tracing::debug!(path = %path.display(), "Loaded .env file");
                Ok(self)
            }
            Err(e) if e.not_found() => Ok(self),
            Err(e) => Err(ConfigError::Dotenv(e.to_string())),
        }
    }

    /// Enables environment overrides with the given prefix.
    ///
    /// `PREFIX__SERVER__HTTP_ADDR=127.0.0.1:9000` sets `server.http_addr`;
    /// `PREFIX__DISPATCH__MODEL_MAPPINGS__Pet=acme.Animal` adds a model
    /// mapping. Values are read as JSON scalars when they parse as such.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Uses the given variables instead of the process environment for
    /// overrides.
    #[must_use]
    pub fn with_env_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env_vars = Some(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Applies environment overrides and validates the result.
    pub fn load(self) -> Result<InflectorConfig, ConfigError> {
        let config = self.load_unvalidated()?;
        config.validate()?;
        Ok(config)
    }

    /// Applies environment overrides without validating.
    pub fn load_unvalidated(mut self) -> Result<InflectorConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            let mut vars: Vec<(String, String)> = match self.env_vars.take() {
                Some(vars) => vars,
                None => env::vars().collect(),
            };
            let scope = format!("{prefix}__");
            vars.retain(|(key, _)| key.starts_with(&scope));
            vars.sort();

            for (key, value) in vars {
                self.apply_env_var(&prefix, &key, &value)?;
            }
        }

        from_tree(self.tree, "configuration")
    }

    fn merge(mut self, overlay: Value, origin: &str) -> Result<Self, ConfigError> {
        merge_tree(&mut self.tree, overlay);
        // Re-read now so errors name the layer that introduced them.
        from_tree(self.tree.clone(), origin)?;
        Ok(self)
    }

    fn apply_env_var(&mut self, prefix: &str, key: &str, raw: &str) -> Result<(), ConfigError> {
        let path: Vec<String> = key
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix("__"))
            .ok_or_else(|| ConfigError::env_override(key, "invalid key format"))?
            .split("__")
            .enumerate()
            .map(|(depth, segment)| {
                if depth < 2 {
                    segment.to_lowercase()
                } else {
                    segment.to_string()
                }
            })
            .collect();

        let mut candidate = self.tree.clone();
        set_path(&mut candidate, &path, raw).map_err(|reason| ConfigError::env_override(key, reason))?;
        serde_json::from_value::<InflectorConfig>(candidate.clone())
            .map_err(|e| ConfigError::env_override(key, e.to_string()))?;

        tracing::debug!(var = %key, "Applied environment override");
        self.tree = candidate;
        Ok(())
    }
}

fn to_tree(config: &InflectorConfig) -> Value {
    serde_json::to_value(config).unwrap_or_else(|_| Value::Object(Map::new()))
}

fn from_tree(tree: Value, origin: &str) -> Result<InflectorConfig, ConfigError> {
    serde_json::from_value(tree).map_err(|e| ConfigError::invalid_value(origin, e.to_string()))
}

fn parse_tree(content: &str, format: &str) -> Result<Value, ConfigError> {
    match format {
        "toml" => Ok(toml::from_str(content)?),
        "json" => Ok(serde_json::from_str(content)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(content)?),
        other => Err(ConfigError::UnsupportedFormat(other.to_string())),
    }
}

fn merge_tree(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (_, Value::Null) => {}
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                if value.is_null() {
                    continue;
                }
                match base.get_mut(&key) {
                    Some(existing) if existing.is_object() && value.is_object() => {
                        merge_tree(existing, value);
                    }
                    _ => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

fn set_path(root: &mut Value, path: &[String], raw: &str) -> Result<(), String> {
    let (last, parents) = path.split_last().ok_or("empty key")?;
    if parents.is_empty() {
        return Err(format!("'{last}' names a section, not a key"));
    }

    let mut node = root;
    for segment in parents {
        node = match node.get_mut(segment.as_str()) {
            Some(child) if child.is_object() => child,
            _ => return Err(format!("unknown configuration key '{segment}'")),
        };
    }
    let Some(fields) = node.as_object_mut() else {
        return Err("not a configuration section".to_string());
    };

    let value = match fields.get(last.as_str()) {
        None if parents.len() == 1 => return Err(format!("unknown configuration key '{last}'")),
        None | Some(Value::String(_)) => Value::String(raw.to_string()),
        Some(_) => serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string())),
    };
    fields.insert(last.clone(), value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use inflector_telemetry::LogFormat;

    // ==================== Layer Tests ====================

    #[test]
    fn test_defaults() {
        let config = ConfigLoader::new().load().expect("defaults load");
        assert_eq!(config, InflectorConfig::default());
    }

    #[test]
    fn test_string_layers_merge() {
        let config = ConfigLoader::new()
            .with_development()
            .with_string(r#"{ "server": { "http_addr": "127.0.0.1:3000" } }"#, "json")
            .expect("valid json")
            .load()
            .expect("valid config");

        assert_eq!(config.server.http_addr, "127.0.0.1:3000");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_yaml_string() {
        let yaml = "dispatch:\n  invalid_request_status_code: 422\n  model_mappings:\n    Pet: acme.Animal\n";
        let config = ConfigLoader::new()
            .with_string(yaml, "yaml")
            .expect("valid yaml")
            .load()
            .expect("valid config");

        assert_eq!(config.dispatch.invalid_request_status_code, 422);
        assert_eq!(
            config.dispatch.model_mappings.get("Pet").map(String::as_str),
            Some("acme.Animal")
        );
    }

    #[test]
    fn test_unknown_field_in_layer() {
        let result = ConfigLoader::new().with_string("[server]\nport = 80\n", "toml");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_unsupported_format() {
        let result = ConfigLoader::new().with_string("a = 1", "ini");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_validation_runs_on_load() {
        let result = ConfigLoader::new()
            .with_string(r#"{ "dispatch": { "invalid_request_status_code": 503 } }"#, "json")
            .expect("valid json")
            .load();
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    // ==================== Environment Tests ====================

    #[test]
    fn test_env_overrides() {
        let config = ConfigLoader::new()
            .with_env_prefix("INFLECTOR")
            .with_env_vars([
                ("INFLECTOR__SERVER__HTTP_ADDR", "127.0.0.1:9000"),
                ("INFLECTOR__SERVER__SHUTDOWN_TIMEOUT_SECS", "5"),
                ("INFLECTOR__DISPATCH__STRICT_SIGNATURES", "true"),
                ("INFLECTOR__DISPATCH__CONTROLLER_PACKAGE", "123"),
                ("INFLECTOR__DISPATCH__MODEL_MAPPINGS__Pet", "acme.Animal"),
                ("INFLECTOR__LOGGING__FORMAT", "pretty"),
                ("OTHER__SERVER__HTTP_ADDR", "ignored"),
            ])
            .load()
            .expect("valid overrides");

        assert_eq!(config.server.http_addr, "127.0.0.1:9000");
        assert_eq!(config.server.shutdown_timeout_secs, 5);
        assert!(config.dispatch.strict_signatures);
        assert_eq!(config.dispatch.controller_package, "123");
        assert_eq!(
            config.dispatch.model_mappings.get("Pet").map(String::as_str),
            Some("acme.Animal")
        );
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_env_unknown_key() {
        let result = ConfigLoader::new()
            .with_env_prefix("INFLECTOR")
            .with_env_vars([("INFLECTOR__SERVER__PORT", "80")])
            .load();
        assert!(matches!(result, Err(ConfigError::EnvOverride { var, .. }) if var == "INFLECTOR__SERVER__PORT"));
    }

    #[test]
    fn test_env_wrong_type() {
        let result = ConfigLoader::new()
            .with_env_prefix("INFLECTOR")
            .with_env_vars([("INFLECTOR__SERVER__MAX_BODY_SIZE", "lots")])
            .load();
        assert!(matches!(result, Err(ConfigError::EnvOverride { .. })));
    }

    #[test]
    fn test_env_ignored_without_prefix() {
        let config = ConfigLoader::new()
            .with_env_vars([("INFLECTOR__SERVER__HTTP_ADDR", "127.0.0.1:1")])
            .load()
            .expect("defaults load");
        assert_eq!(config.server.http_addr, "0.0.0.0:8080");
    }

    // ==================== Tree Tests ====================

    #[test]
    fn test_merge_tree_is_deep() {
        let mut base = serde_json::json!({ "a": { "x": 1, "y": 2 }, "b": 1 });
        merge_tree(&mut base, serde_json::json!({ "a": { "y": 3 }, "c": null }));
        assert_eq!(base, serde_json::json!({ "a": { "x": 1, "y": 3 }, "b": 1 }));
    }
}
