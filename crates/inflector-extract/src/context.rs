//! Extraction context providing access to request data.
//!
//! The [`ExtractionContext`] is everything the dispatcher knows about one
//! request: method, URI, headers, the fully read body and, once an operation
//! has been matched, the path template variables.

use bytes::Bytes;
use http::{HeaderMap, Method, Uri};
use inflector_core::{essence, PathParams};

/// Context providing access to all parts of an HTTP request.
///
/// # Example
///
/// ```rust
/// use inflector_extract::ExtractionContext;
/// use http::Method;
///
/// let ctx = ExtractionContext::builder()
///     .method(Method::GET)
///     .uri("/v2/pet/findByStatus?status=available&status=sold")
///     .build();
///
/// assert_eq!(ctx.path(), "/v2/pet/findByStatus");
/// assert_eq!(ctx.query_values("status"), vec!["available", "sold"]);
/// ```
#[derive(Debug, Clone)]
pub struct ExtractionContext {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    path_params: PathParams,
    query: Vec<(String, String)>,
}

impl ExtractionContext {
    /// Creates a new extraction context.
    ///
    /// The query string is decoded here, once. Pairs keep their order.
    #[must_use]
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Self {
        let query = uri.query().map(decode_pairs).unwrap_or_default();
        Self {
            method,
            uri,
            headers,
            body,
            path_params: PathParams::new(),
            query,
        }
    }

    /// Creates a builder.
    #[must_use]
    pub fn builder() -> ExtractionContextBuilder {
        ExtractionContextBuilder::new()
    }

    /// Sets the path variables captured when the operation was matched.
    #[must_use]
    pub fn with_path_params(mut self, path_params: PathParams) -> Self {
        self.path_params = path_params;
        self
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the path portion of the URI.
    #[must_use]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the request body as bytes.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the path variables.
    #[must_use]
    pub fn path_params(&self) -> &PathParams {
        &self.path_params
    }

    /// Returns a path variable.
    #[must_use]
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name).map(String::as_str)
    }

    /// Returns the decoded query pairs in request order.
    #[must_use]
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// Returns every value of a query parameter, in request order.
    #[must_use]
    pub fn query_values(&self, name: &str) -> Vec<&str> {
        self.query
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    /// Returns every value of a header, in request order.
    ///
    /// Values that are not visible ASCII are skipped.
    #[must_use]
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .get_all(name)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect()
    }

    /// Returns the first value of a header.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the Content-Type without parameters, lower-cased.
    #[must_use]
    pub fn media_type(&self) -> Option<String> {
        self.header("content-type").map(essence)
    }

    /// Checks if the request body is empty.
    #[must_use]
    pub fn is_body_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Decodes `application/x-www-form-urlencoded` text into ordered pairs.
///
/// Undecodable input yields no pairs.
pub(crate) fn decode_pairs(encoded: &str) -> Vec<(String, String)> {
    match serde_urlencoded::from_str::<Vec<(String, String)>>(encoded) {
        Ok(pairs) => pairs,
        Err(e) => {
            tracing::debug!(error = %e, "ignoring undecodable url-encoded pairs");
            Vec::new()
        }
    }
}

/// Builder for constructing an `ExtractionContext`.
#[derive(Debug, Default)]
pub struct ExtractionContextBuilder {
    method: Option<Method>,
    uri: Option<Uri>,
    headers: HeaderMap,
    body: Bytes,
    path_params: PathParams,
}

impl ExtractionContextBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the URI. Unparsable URIs are ignored.
    #[must_use]
    pub fn uri(mut self, uri: &str) -> Self {
        if let Ok(uri) = uri.parse() {
            self.uri = Some(uri);
        }
        self
    }

    /// Sets the headers.
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Appends a header value.
    #[must_use]
    pub fn header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(value) = value.parse() {
            self.headers.append(name, value);
        }
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Adds a path variable.
    #[must_use]
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(name.into(), value.into());
        self
    }

    /// Builds the extraction context.
    #[must_use]
    pub fn build(self) -> ExtractionContext {
        ExtractionContext::new(
            self.method.unwrap_or(Method::GET),
            self.uri.unwrap_or_else(|| Uri::from_static("/")),
            self.headers,
            self.body,
        )
        .with_path_params(self.path_params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_basics() {
        let ctx = ExtractionContext::builder()
            .method(Method::POST)
            .uri("/v2/pet/12")
            .header("content-type", "application/json; charset=utf-8")
            .body("{}")
            .path_param("petId", "12")
            .build();

        assert_eq!(ctx.method(), &Method::POST);
        assert_eq!(ctx.path(), "/v2/pet/12");
        assert_eq!(ctx.path_param("petId"), Some("12"));
        assert_eq!(ctx.media_type().as_deref(), Some("application/json"));
        assert!(!ctx.is_body_empty());
    }

    #[test]
    fn test_query_values_decoded_in_order() {
        let ctx = ExtractionContext::builder()
            .uri("/search?tag=a%2Cb&limit=5&tag=hello+world")
            .build();

        assert_eq!(ctx.query_values("tag"), vec!["a,b", "hello world"]);
        assert_eq!(ctx.query_values("limit"), vec!["5"]);
        assert!(ctx.query_values("missing").is_empty());
        assert_eq!(ctx.query_pairs().len(), 3);
    }

    #[test]
    fn test_multi_value_headers() {
        let ctx = ExtractionContext::builder()
            .header("x-tag", "one")
            .header("x-tag", "two")
            .build();

        assert_eq!(ctx.header_values("X-Tag"), vec!["one", "two"]);
        assert_eq!(ctx.header("x-tag"), Some("one"));
    }

    #[test]
    fn test_defaults() {
        let ctx = ExtractionContext::builder().build();
        assert_eq!(ctx.method(), &Method::GET);
        assert_eq!(ctx.path(), "/");
        assert!(ctx.media_type().is_none());
        assert!(ctx.is_body_empty());
    }
}
