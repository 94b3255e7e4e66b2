//! # Inflector Extract
//!
//! Parameter extraction and type coercion for the Inflector dispatcher.
//!
//! Every contract parameter names a location. This crate reads the raw
//! value(s) from that location and coerces them to the declared type:
//!
//! | Location | Source | Raw values |
//! |----------|--------|------------|
//! | `path` | Path template variables | One |
//! | `query` | Query string | Every occurrence, in order |
//! | `header` | Headers | Every occurrence, in order |
//! | `formData` | URL-encoded body, decoded once | Every occurrence, in order |
//! | `formData` (`file`) | Raw request body | Bytes, not coerced |
//! | `body` | Request body, decoded once as JSON or YAML | A model value |
//!
//! ## Example
//!
//! ```rust
//! use inflector_core::{CollectionFormat, Parameter, ParameterLocation, PrimitiveType};
//! use inflector_extract::{missing_required, ExtractionContext, ParameterExtractor};
//!
//! let parameters = vec![
//!     Parameter::array("status", ParameterLocation::Query, PrimitiveType::String, Some(CollectionFormat::Csv))
//!         .required(),
//!     Parameter::header("api_key", PrimitiveType::String).required(),
//! ];
//! let ctx = ExtractionContext::builder()
//!     .uri("/v2/pet/findByStatus?status=available,sold")
//!     .build();
//!
//! let args = ParameterExtractor::new(&ctx).extract_all(&parameters);
//! assert_eq!(args.list("status").map(|items| items.len()), Some(2));
//!
//! let missing = missing_required(&parameters, &args);
//! assert_eq!(missing[0].to_string(), "api_key (header)");
//! ```
//!
//! ## Error Handling
//!
//! Coercion never fails loudly: a malformed value is treated as absent. A
//! body or form payload that does not decode is logged and likewise treated
//! as absent. [`ExtractionError`] carries the cause for logging and the
//! status the HTTP layer uses for payloads it refuses outright.

#![doc(html_root_url = "https://docs.rs/inflector-extract/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod body;
pub mod coerce;
mod context;
mod error;
mod extract;
mod form;

pub use body::decode_body;
pub use coerce::{coerce, coerce_primitive};
pub use context::{ExtractionContext, ExtractionContextBuilder};
pub use error::{ExtractionError, ExtractionSource};
pub use extract::{missing_required, ParameterExtractor};
pub use form::FormFields;
