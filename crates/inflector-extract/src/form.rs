//! URL-encoded form bodies.
//!
//! [`FormFields`] holds the decoded `application/x-www-form-urlencoded` body
//! of one request. Values are percent-decoded and `+` reads as a space.

use crate::{ExtractionError, ExtractionSource};

/// Decoded form fields in body order.
///
/// # Example
///
/// ```rust
/// use inflector_extract::FormFields;
///
/// let form = FormFields::decode(b"name=doggie&status=sold&status=pending").unwrap();
/// assert_eq!(form.values("status"), vec!["sold", "pending"]);
/// assert_eq!(form.values("name"), vec!["doggie"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pairs: Vec<(String, String)>,
}

impl FormFields {
    /// Decodes a form body.
    ///
    /// An empty body decodes to no fields.
    pub fn decode(payload: &[u8]) -> Result<Self, ExtractionError> {
        if payload.is_empty() {
            return Ok(Self::default());
        }
        let text = std::str::from_utf8(payload)
            .map_err(|e| ExtractionError::malformed(ExtractionSource::Form, e.to_string()))?;
        let pairs = serde_urlencoded::from_str::<Vec<(String, String)>>(text)
            .map_err(|e| ExtractionError::malformed(ExtractionSource::Form, e.to_string()))?;
        Ok(Self { pairs })
    }

    /// Returns every value of a field, in body order.
    #[must_use]
    pub fn values(&self, name: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    /// Returns the number of decoded pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if the body held no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
