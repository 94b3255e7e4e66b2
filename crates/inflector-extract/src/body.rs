//! Request body decoding.
//!
//! Body parameters are decoded from the whole payload according to the
//! request's declared media type. JSON is the default; any `yaml` media type
//! is read as YAML. Form and multipart payloads are not models.

use crate::{ExtractionError, ExtractionSource};
use serde_json::Value;

/// Decodes a request payload into a JSON value.
///
/// `media_type` is the Content-Type essence (see
/// [`ExtractionContext::media_type`](crate::ExtractionContext::media_type)).
/// A missing media type is read as JSON.
///
/// # Example
///
/// ```rust
/// use inflector_extract::decode_body;
///
/// let value = decode_body(b"name: doggie\n", Some("application/yaml")).unwrap();
/// assert_eq!(value, serde_json::json!({ "name": "doggie" }));
/// ```
pub fn decode_body(payload: &[u8], media_type: Option<&str>) -> Result<Value, ExtractionError> {
    match media_type {
        Some(media_type) if media_type.contains("yaml") => serde_yaml::from_slice(payload)
            .map_err(|e| ExtractionError::malformed(ExtractionSource::Body, e.to_string())),
        Some(media_type)
            if media_type.starts_with("multipart/")
                || media_type == "application/x-www-form-urlencoded" =>
        {
            Err(ExtractionError::unsupported_media_type(media_type))
        }
        _ => serde_json::from_slice(payload)
            .map_err(|e| ExtractionError::malformed(ExtractionSource::Body, e.to_string())),
    }
}
