//! Outgoing response envelope.
//!
//! Handlers either return a plain value (sent as `200 OK`) or a
//! [`ResponseContext`] that spells out status, headers, content type and
//! body. The dispatcher produces a `ResponseContext` for every request; the
//! HTTP layer turns it into bytes.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error body sent to clients.
///
/// ```
/// use inflector_core::ApiError;
///
/// let body = ApiError::new(400, "Missing required Parameter petId (path)");
/// assert_eq!(
///     serde_json::to_value(&body).unwrap(),
///     serde_json::json!({ "code": 400, "message": "Missing required Parameter petId (path)" })
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// HTTP status code repeated in the body.
    pub code: u16,
    /// Human-readable message.
    pub message: String,
}

impl ApiError {
    /// Creates an error body.
    #[must_use]
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Response envelope: status, header multimap, content type and body.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseContext {
    status: StatusCode,
    headers: Vec<(String, String)>,
    content_type: Option<String>,
    entity: Option<Value>,
}

impl Default for ResponseContext {
    fn default() -> Self {
        Self::ok()
    }
}

impl ResponseContext {
    /// Creates an empty response with the given status.
    #[must_use]
    pub const fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            content_type: None,
            entity: None,
        }
    }

    /// Creates an empty `200 OK` response.
    #[must_use]
    pub const fn ok() -> Self {
        Self::new(StatusCode::OK)
    }

    /// Creates an error response whose body is an [`ApiError`].
    #[must_use]
    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        let body = ApiError::new(status.as_u16(), message);
        Self::new(status).with_entity(api_error_value(&body))
    }

    /// Sets the status.
    #[must_use]
    pub const fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Appends a header. Repeated names are kept.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_entity(mut self, entity: Value) -> Self {
        self.entity = Some(entity);
        self
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the headers in insertion order.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Returns all values of a header (case-insensitive name).
    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the content type.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Returns the body.
    #[must_use]
    pub const fn entity(&self) -> Option<&Value> {
        self.entity.as_ref()
    }

    /// Consumes the envelope and returns the body.
    #[must_use]
    pub fn into_entity(self) -> Option<Value> {
        self.entity
    }
}

fn api_error_value(body: &ApiError) -> Value {
    serde_json::json!({ "code": body.code, "message": body.message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_envelope() {
        let response = ResponseContext::error(StatusCode::BAD_REQUEST, "bad");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.entity(), Some(&json!({ "code": 400, "message": "bad" })));
    }

    #[test]
    fn test_header_multimap() {
        let response = ResponseContext::ok()
            .with_header("Set-Cookie", "a=1")
            .with_header("set-cookie", "b=2")
            .with_header("X-Rate-Limit", "10");
        let cookies: Vec<&str> = response.header_values("SET-COOKIE").collect();
        assert_eq!(cookies, vec!["a=1", "b=2"]);
        assert_eq!(response.headers().len(), 3);
    }

    #[test]
    fn test_builder_fields() {
        let response = ResponseContext::new(StatusCode::CREATED)
            .with_content_type("application/yaml")
            .with_entity(json!({ "id": 1 }));
        assert_eq!(response.content_type(), Some("application/yaml"));
        assert_eq!(response.clone().into_entity(), Some(json!({ "id": 1 })));
        assert_eq!(ResponseContext::default().status(), StatusCode::OK);
    }
}
