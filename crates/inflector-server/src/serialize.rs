//! Response body serialization.
//!
//! Entities are `serde_json::Value`s; [`SerializationConfig`] renders them
//! as JSON, YAML or plain text. The configuration is an explicit value owned
//! by the server, never process-global state.

use bytes::Bytes;
use inflector_core::essence;
use serde_json::Value;
use thiserror::Error;

/// JSON media type.
pub const APPLICATION_JSON: &str = "application/json";

/// YAML media type.
pub const APPLICATION_YAML: &str = "application/yaml";

/// Plain text media type.
pub const TEXT_PLAIN: &str = "text/plain";

/// Wildcard media range.
const ANY: &str = "*/*";

/// Errors raised while rendering an entity.
#[derive(Debug, Error)]
pub enum SerializationError {
    /// JSON rendering failed.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML rendering failed.
    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A rendered body and the content type it was rendered as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBody {
    /// Content type header value.
    pub content_type: &'static str,
    /// Body bytes.
    pub bytes: Bytes,
}

/// Body rendering settings.
///
/// # Example
///
/// ```rust
/// use inflector_server::serialize::SerializationConfig;
/// use serde_json::json;
///
/// let config = SerializationConfig::new();
/// let body = config.render(&json!({ "id": 1 }), Some("application/yaml")).unwrap();
/// assert_eq!(body.content_type, "application/yaml");
/// assert_eq!(body.bytes, "id: 1\n");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SerializationConfig {
    pretty: bool,
}

impl SerializationConfig {
    /// Creates a compact configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: false }
    }

    /// Enables or disables pretty-printed JSON.
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Returns whether JSON is pretty-printed.
    #[must_use]
    pub const fn is_pretty(&self) -> bool {
        self.pretty
    }

    /// Renders an entity for a media type.
    ///
    /// YAML media types render as YAML, `text/plain` renders string entities
    /// verbatim, and everything else (including no media type) renders as
    /// JSON.
    pub fn render(
        &self,
        entity: &Value,
        media_type: Option<&str>,
    ) -> Result<RenderedBody, SerializationError> {
        let media_type = media_type.map(essence).unwrap_or_default();

        if media_type.contains("yaml") {
            let text = serde_yaml::to_string(entity)?;
            return Ok(RenderedBody {
                content_type: APPLICATION_YAML,
                bytes: Bytes::from(text),
            });
        }

        if media_type == TEXT_PLAIN {
            if let Value::String(text) = entity {
                return Ok(RenderedBody {
                    content_type: TEXT_PLAIN,
                    bytes: Bytes::from(text.clone()),
                });
            }
        }

        let bytes = if self.pretty {
            serde_json::to_vec_pretty(entity)?
        } else {
            serde_json::to_vec(entity)?
        };
        Ok(RenderedBody {
            content_type: APPLICATION_JSON,
            bytes: Bytes::from(bytes),
        })
    }
}

/// Picks the response media type from the accept list and the operation's
/// `produces` list.
///
/// The first acceptable entry that the operation produces wins; `*/*` and an
/// empty accept list select the first produced type. Without a `produces`
/// list the first accepted type is used as is.
///
/// ```rust
/// use inflector_server::serialize::negotiate;
///
/// let produces = vec!["application/json".to_string(), "application/yaml".to_string()];
/// let accept = vec!["application/yaml".to_string()];
/// assert_eq!(negotiate(&accept, &produces).as_deref(), Some("application/yaml"));
/// assert_eq!(negotiate(&[], &produces).as_deref(), Some("application/json"));
/// ```
#[must_use]
pub fn negotiate(accept: &[String], produces: &[String]) -> Option<String> {
    if produces.is_empty() {
        return accept
            .iter()
            .find(|media_type| media_type.as_str() != ANY)
            .cloned();
    }

    let produced: Vec<String> = produces.iter().map(|p| essence(p)).collect();
    for wanted in accept {
        if wanted == ANY {
            return produced.first().cloned();
        }
        if let Some(found) = produced.iter().find(|p| media_range_matches(wanted, p)) {
            return Some(found.clone());
        }
    }
    produced.first().cloned()
}

/// Returns `true` if a media range (`application/*`, `application/json`)
/// covers a media type.
fn media_range_matches(range: &str, media_type: &str) -> bool {
    match range.strip_suffix("/*") {
        Some(kind) => media_type
            .split_once('/')
            .is_some_and(|(t, _)| t.eq_ignore_ascii_case(kind)),
        None => range.eq_ignore_ascii_case(media_type),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    // ==================== Render Tests ====================

    #[test]
    fn test_render_json_default() {
        let body = SerializationConfig::new()
            .render(&json!({ "name": "doggie" }), None)
            .unwrap();
        assert_eq!(body.content_type, APPLICATION_JSON);
        assert_eq!(body.bytes, r#"{"name":"doggie"}"#);
    }

    #[test]
    fn test_render_pretty_json() {
        let body = SerializationConfig::new()
            .pretty(true)
            .render(&json!({ "id": 1 }), Some("application/json; charset=utf-8"))
            .unwrap();
        assert_eq!(body.bytes, "{\n  \"id\": 1\n}");
    }

    #[test]
    fn test_render_yaml() {
        let body = SerializationConfig::new()
            .render(&json!({ "status": "available" }), Some("application/x-yaml"))
            .unwrap();
        assert_eq!(body.content_type, APPLICATION_YAML);
        assert_eq!(body.bytes, "status: available\n");
    }

    #[test]
    fn test_render_plain_text() {
        let config = SerializationConfig::new();

        let text = config.render(&json!("token-123"), Some("text/plain")).unwrap();
        assert_eq!(text.content_type, TEXT_PLAIN);
        assert_eq!(text.bytes, "token-123");

        // Non-string entities fall back to JSON.
        let object = config.render(&json!({ "a": 1 }), Some("text/plain")).unwrap();
        assert_eq!(object.content_type, APPLICATION_JSON);
    }

    #[test]
    fn test_unsupported_media_type_renders_json() {
        let body = SerializationConfig::new()
            .render(&json!([1, 2]), Some("application/xml"))
            .unwrap();
        assert_eq!(body.content_type, APPLICATION_JSON);
        assert_eq!(body.bytes, "[1,2]");
    }

    // ==================== Negotiation Tests ====================

    #[test]
    fn test_negotiate_prefers_accept_order() {
        let produces = strings(&["application/json", "application/yaml"]);
        let accept = strings(&["text/html", "application/yaml", "application/json"]);
        assert_eq!(negotiate(&accept, &produces).as_deref(), Some("application/yaml"));
    }

    #[test]
    fn test_negotiate_wildcards() {
        let produces = strings(&["application/yaml", "application/json"]);
        assert_eq!(
            negotiate(&strings(&["*/*"]), &produces).as_deref(),
            Some("application/yaml")
        );
        assert_eq!(
            negotiate(&strings(&["text/*", "application/*"]), &produces).as_deref(),
            Some("application/yaml")
        );
    }

    #[test]
    fn test_negotiate_without_produces() {
        assert_eq!(
            negotiate(&strings(&["*/*", "application/yaml"]), &[]).as_deref(),
            Some("application/yaml")
        );
        assert_eq!(negotiate(&[], &[]), None);
    }

    #[test]
    fn test_negotiate_no_overlap_uses_first_produced() {
        let produces = strings(&["application/json"]);
        assert_eq!(
            negotiate(&strings(&["application/xml"]), &produces).as_deref(),
            Some("application/json")
        );
    }
}
