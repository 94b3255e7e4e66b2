//! Extraction error types.
//!
//! Extraction errors never reach clients directly: the dispatcher treats a
//! value that could not be decoded as absent, and absence of a required
//! value is reported as a missing parameter. The errors exist so the cause
//! can be logged, and so the HTTP layer can reject oversized payloads.

use http::StatusCode;
use inflector_core::ParameterLocation;
use std::fmt;
use thiserror::Error;

/// Part of the request a value was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionSource {
    /// Path template variables
    Path,
    /// Query string parameters
    Query,
    /// HTTP headers
    Header,
    /// URL-encoded form body
    Form,
    /// Request body (JSON, YAML or raw bytes)
    Body,
}

impl From<ParameterLocation> for ExtractionSource {
    fn from(location: ParameterLocation) -> Self {
        match location {
            ParameterLocation::Path => Self::Path,
            ParameterLocation::Query => Self::Query,
            ParameterLocation::Header => Self::Header,
            ParameterLocation::FormData => Self::Form,
            ParameterLocation::Body => Self::Body,
        }
    }
}

impl fmt::Display for ExtractionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path => write!(f, "path"),
            Self::Query => write!(f, "query"),
            Self::Header => write!(f, "header"),
            Self::Form => write!(f, "form"),
            Self::Body => write!(f, "body"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExtractionErrorKind {
    /// The raw input is not valid for its encoding
    Malformed,
    /// The body is larger than allowed
    PayloadTooLarge,
    /// The declared media type cannot be decoded
    UnsupportedMediaType,
}

/// Error that occurs while decoding part of a request.
///
/// # Example
///
/// ```rust
/// use inflector_extract::{ExtractionError, ExtractionSource};
/// use http::StatusCode;
///
/// let err = ExtractionError::malformed(ExtractionSource::Body, "expected value at line 1");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// assert_eq!(err.extraction_source(), ExtractionSource::Body);
/// assert!(err.to_string().contains("line 1"));
/// ```
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ExtractionError {
    extraction_source: ExtractionSource,
    kind: ExtractionErrorKind,
    message: String,
}

impl ExtractionError {
    /// Creates an error for input that does not decode.
    #[must_use]
    pub fn malformed(source: ExtractionSource, details: impl Into<String>) -> Self {
        let details = details.into();
        Self {
            extraction_source: source,
            kind: ExtractionErrorKind::Malformed,
            message: format!("malformed {source}: {details}"),
        }
    }

    /// Creates an error for a payload that's too large.
    #[must_use]
    pub fn payload_too_large(max_size: usize, actual_size: usize) -> Self {
        Self {
            extraction_source: ExtractionSource::Body,
            kind: ExtractionErrorKind::PayloadTooLarge,
            message: format!("payload too large: max {max_size} bytes, got {actual_size} bytes"),
        }
    }

    /// Creates an error for a body media type that cannot be decoded.
    #[must_use]
    pub fn unsupported_media_type(actual: &str) -> Self {
        Self {
            extraction_source: ExtractionSource::Body,
            kind: ExtractionErrorKind::UnsupportedMediaType,
            message: format!("unsupported content type '{actual}'"),
        }
    }

    /// Returns the extraction source.
    #[must_use]
    pub fn extraction_source(&self) -> ExtractionSource {
        self.extraction_source
    }

    /// Returns the appropriate HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self.kind {
            ExtractionErrorKind::Malformed => StatusCode::BAD_REQUEST,
            ExtractionErrorKind::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ExtractionErrorKind::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        }
    }
}
