//! Type coercion of raw wire values.
//!
//! Query, path, header and form values arrive as text. [`coerce`] turns them
//! into a [`ParamValue`] according to the parameter's declared type.
//!
//! Coercion is best-effort: a value that does not parse is treated exactly
//! like a value that was never sent. Whether that matters is decided later,
//! when required parameters are checked.
//!
//! # Arrays
//!
//! | Collection format | Split on |
//! |-------------------|----------|
//! | `csv`   | `,` |
//! | `ssv`   | space |
//! | `tsv`   | tab |
//! | `pipes` | `\|` |
//! | `multi` | nothing, every raw value is one item |
//!
//! An array parameter with no collection format coerces to an empty array.
//! Empty raw values contribute nothing, trailing empty tokens are ignored,
//! and items that fail to parse are dropped.
//!
//! # Example
//!
//! ```rust
//! use inflector_core::{CollectionFormat, Parameter, ParameterLocation, ParamValue, PrimitiveType};
//! use inflector_extract::coerce;
//!
//! let ids = Parameter::array("ids", ParameterLocation::Query, PrimitiveType::Integer, Some(CollectionFormat::Csv));
//! assert_eq!(
//!     coerce(&["1,x,3"], &ids),
//!     Some(ParamValue::Array(vec![ParamValue::Integer(1), ParamValue::Integer(3)]))
//! );
//!
//! let limit = Parameter::query("limit", PrimitiveType::Integer);
//! assert_eq!(coerce(&["ten"], &limit), None);
//! ```

use inflector_core::{CollectionFormat, ParamValue, Parameter, ParameterType, PrimitiveType};
use std::fmt;
use uuid::Uuid;

/// Length of the canonical hyphenated UUID form.
const UUID_TEXT_LEN: usize = 36;

/// Why a single raw token did not coerce. Never leaves this module.
#[derive(Debug)]
struct CoercionError {
    target: PrimitiveType,
    token: String,
}

impl fmt::Display for CoercionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a valid {:?}", self.token, self.target)
    }
}

/// Coerces raw values into a typed value for `parameter`.
///
/// Returns `None` when `raw` is empty or when a scalar does not parse. File
/// and body parameters are not textual and always yield `None` here; they
/// are read straight from the request body by the extractor.
#[must_use]
pub fn coerce<S: AsRef<str>>(raw: &[S], parameter: &Parameter) -> Option<ParamValue> {
    let first = raw.first()?;
    match parameter.param_type() {
        ParameterType::Primitive { primitive } => discard(coerce_scalar(first.as_ref(), *primitive)),
        ParameterType::Array {
            items,
            collection_format,
        } => Some(ParamValue::Array(coerce_array(raw, *items, *collection_format))),
        ParameterType::File | ParameterType::Body { .. } => None,
    }
}

/// Coerces a single token to a scalar type.
///
/// Returns `None` for text that does not parse.
#[must_use]
pub fn coerce_primitive(token: &str, target: PrimitiveType) -> Option<ParamValue> {
    discard(coerce_scalar(token, target))
}

fn coerce_array<S: AsRef<str>>(
    raw: &[S],
    items: PrimitiveType,
    format: Option<CollectionFormat>,
) -> Vec<ParamValue> {
    let Some(format) = format else {
        tracing::trace!("array parameter without collection format coerces to empty");
        return Vec::new();
    };

    let mut values = Vec::new();
    for element in raw {
        let element = element.as_ref();
        if element.is_empty() {
            continue;
        }
        match format.delimiter() {
            Some(delimiter) => values.extend(
                split_tokens(element, delimiter)
                    .into_iter()
                    .filter_map(|token| discard(coerce_scalar(token, items))),
            ),
            None => values.extend(discard(coerce_scalar(element, items))),
        }
    }
    values
}

/// Splits on `delimiter`, dropping trailing empty tokens.
fn split_tokens(element: &str, delimiter: char) -> Vec<&str> {
    let mut tokens: Vec<&str> = element.split(delimiter).collect();
    while tokens.last().is_some_and(|token| token.is_empty()) {
        tokens.pop();
    }
    tokens
}

fn coerce_scalar(token: &str, target: PrimitiveType) -> Result<ParamValue, CoercionError> {
    let fail = || CoercionError {
        target,
        token: token.to_string(),
    };

    match target {
        PrimitiveType::Integer => token.parse().map(ParamValue::Integer).map_err(|_| fail()),
        PrimitiveType::Long => token.parse().map(ParamValue::Long).map_err(|_| fail()),
        PrimitiveType::Float => token.parse().map(ParamValue::Float).map_err(|_| fail()),
        PrimitiveType::Double => token.parse().map(ParamValue::Double).map_err(|_| fail()),
        PrimitiveType::Boolean => Ok(ParamValue::Boolean(
            token.eq_ignore_ascii_case("true") || token == "1",
        )),
        PrimitiveType::Uuid => {
            if token.len() != UUID_TEXT_LEN {
                return Err(fail());
            }
            Uuid::try_parse(token).map(ParamValue::Uuid).map_err(|_| fail())
        }
        PrimitiveType::String
        | PrimitiveType::Email
        | PrimitiveType::Date
        | PrimitiveType::DateTime
        | PrimitiveType::Password
        | PrimitiveType::Byte
        | PrimitiveType::Binary => Ok(ParamValue::String(token.to_string())),
    }
}

fn discard(result: Result<ParamValue, CoercionError>) -> Option<ParamValue> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::trace!(error = %e, "coercion failed, value treated as absent");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inflector_core::{ParameterLocation, Schema};
    use proptest::prelude::*;

    fn query(primitive: PrimitiveType) -> Parameter {
        Parameter::query("value", primitive)
    }

    fn array(items: PrimitiveType, format: Option<CollectionFormat>) -> Parameter {
        Parameter::array("values", ParameterLocation::Query, items, format)
    }

    fn strings(values: &[&str]) -> ParamValue {
        ParamValue::Array(values.iter().map(|v| ParamValue::String((*v).to_string())).collect())
    }

    // ==================== Scalar Tests ====================

    #[test]
    fn test_empty_input_is_absent() {
        let empty: [&str; 0] = [];
        assert_eq!(coerce(&empty, &query(PrimitiveType::String)), None);
        assert_eq!(coerce(&empty, &array(PrimitiveType::String, Some(CollectionFormat::Csv))), None);
    }

    #[test]
    fn test_numeric_scalars() {
        assert_eq!(coerce(&["42"], &query(PrimitiveType::Integer)), Some(ParamValue::Integer(42)));
        assert_eq!(
            coerce(&["9000000000"], &query(PrimitiveType::Long)),
            Some(ParamValue::Long(9_000_000_000))
        );
        assert_eq!(coerce(&["1.5"], &query(PrimitiveType::Float)), Some(ParamValue::Float(1.5)));
        assert_eq!(coerce(&["2e3"], &query(PrimitiveType::Double)), Some(ParamValue::Double(2000.0)));
    }

    #[test]
    fn test_malformed_numbers_are_absent() {
        assert_eq!(coerce(&["abc"], &query(PrimitiveType::Integer)), None);
        assert_eq!(coerce(&["9000000000"], &query(PrimitiveType::Integer)), None);
        assert_eq!(coerce(&["1.5"], &query(PrimitiveType::Long)), None);
        assert_eq!(coerce(&[""], &query(PrimitiveType::Double)), None);
    }

    #[test]
    fn test_boolean_never_fails() {
        let param = query(PrimitiveType::Boolean);
        assert_eq!(coerce(&["true"], &param), Some(ParamValue::Boolean(true)));
        assert_eq!(coerce(&["TRUE"], &param), Some(ParamValue::Boolean(true)));
        assert_eq!(coerce(&["1"], &param), Some(ParamValue::Boolean(true)));
        assert_eq!(coerce(&["false"], &param), Some(ParamValue::Boolean(false)));
        assert_eq!(coerce(&["yes"], &param), Some(ParamValue::Boolean(false)));
    }

    #[test]
    fn test_uuid_canonical_only() {
        let param = query(PrimitiveType::Uuid);
        let canonical = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
        assert_eq!(
            coerce(&[canonical], &param),
            Some(ParamValue::Uuid(Uuid::parse_str(canonical).expect("valid")))
        );
        assert_eq!(coerce(&["3fa85f6457174562b3fc2c963f66afa6"], &param), None);
        assert_eq!(coerce(&["not-a-uuid"], &param), None);
    }

    #[test]
    fn test_textual_pass_through() {
        assert_eq!(
            coerce(&["user@example.com"], &query(PrimitiveType::Email)),
            Some(ParamValue::String("user@example.com".to_string()))
        );
        assert_eq!(
            coerce(&["anything at all"], &query(PrimitiveType::String)),
            Some(ParamValue::String("anything at all".to_string()))
        );
    }

    #[test]
    fn test_first_raw_value_wins_for_scalars() {
        assert_eq!(
            coerce(&["1", "2"], &query(PrimitiveType::Integer)),
            Some(ParamValue::Integer(1))
        );
    }

    #[test]
    fn test_non_textual_parameters() {
        assert_eq!(coerce(&["x"], &Parameter::file("upload")), None);
        assert_eq!(coerce(&["{}"], &Parameter::body("body", Schema::any())), None);
    }

    // ==================== Array Tests ====================

    #[test]
    fn test_delimited_arrays() {
        assert_eq!(
            coerce(&["a,b,c"], &array(PrimitiveType::String, Some(CollectionFormat::Csv))),
            Some(strings(&["a", "b", "c"]))
        );
        assert_eq!(
            coerce(&["a|b"], &array(PrimitiveType::String, Some(CollectionFormat::Pipes))),
            Some(strings(&["a", "b"]))
        );
        assert_eq!(
            coerce(&["a b"], &array(PrimitiveType::String, Some(CollectionFormat::Ssv))),
            Some(strings(&["a", "b"]))
        );
        assert_eq!(
            coerce(&["a\tb"], &array(PrimitiveType::String, Some(CollectionFormat::Tsv))),
            Some(strings(&["a", "b"]))
        );
    }

    #[test]
    fn test_invalid_items_dropped() {
        assert_eq!(
            coerce(&["1,x,3"], &array(PrimitiveType::Integer, Some(CollectionFormat::Csv))),
            Some(ParamValue::Array(vec![ParamValue::Integer(1), ParamValue::Integer(3)]))
        );
    }

    #[test]
    fn test_every_raw_value_is_split() {
        assert_eq!(
            coerce(&["a,b", "c"], &array(PrimitiveType::String, Some(CollectionFormat::Csv))),
            Some(strings(&["a", "b", "c"]))
        );
    }

    #[test]
    fn test_multi_keeps_values_whole() {
        assert_eq!(
            coerce(&["a,b", "c"], &array(PrimitiveType::String, Some(CollectionFormat::Multi))),
            Some(strings(&["a,b", "c"]))
        );
    }

    #[test]
    fn test_empty_raw_value_yields_empty_array() {
        let csv = array(PrimitiveType::String, Some(CollectionFormat::Csv));
        assert_eq!(coerce(&[""], &csv), Some(ParamValue::Array(Vec::new())));
        assert_eq!(
            coerce(&["", "a"], &array(PrimitiveType::String, Some(CollectionFormat::Multi))),
            Some(strings(&["a"]))
        );
    }

    #[test]
    fn test_trailing_empty_tokens_dropped() {
        let csv = array(PrimitiveType::String, Some(CollectionFormat::Csv));
        assert_eq!(coerce(&["a,b,"], &csv), Some(strings(&["a", "b"])));
        assert_eq!(coerce(&["a,b,,"], &csv), Some(strings(&["a", "b"])));
        assert_eq!(coerce(&[",,"], &csv), Some(ParamValue::Array(Vec::new())));
        assert_eq!(coerce(&["a,,b"], &csv), Some(strings(&["a", "", "b"])));
    }

    #[test]
    fn test_missing_format_yields_empty_array() {
        assert_eq!(
            coerce(&["a,b"], &array(PrimitiveType::String, None)),
            Some(ParamValue::Array(Vec::new()))
        );
    }

    // ==================== Property Tests ====================

    proptest! {
        #[test]
        fn prop_integers_round_trip(n in any::<i32>()) {
            prop_assert_eq!(
                coerce(&[n.to_string()], &query(PrimitiveType::Integer)),
                Some(ParamValue::Integer(n))
            );
        }

        #[test]
        fn prop_longs_round_trip(n in any::<i64>()) {
            prop_assert_eq!(
                coerce(&[n.to_string()], &query(PrimitiveType::Long)),
                Some(ParamValue::Long(n))
            );
        }

        #[test]
        fn prop_doubles_round_trip(n in -1.0e12f64..1.0e12f64) {
            prop_assert_eq!(
                coerce(&[n.to_string()], &query(PrimitiveType::Double)),
                Some(ParamValue::Double(n))
            );
        }

        #[test]
        fn prop_uuids_round_trip(bytes in any::<[u8; 16]>()) {
            let uuid = Uuid::from_bytes(bytes);
            prop_assert_eq!(
                coerce(&[uuid.hyphenated().to_string()], &query(PrimitiveType::Uuid)),
                Some(ParamValue::Uuid(uuid))
            );
        }

        #[test]
        fn prop_arbitrary_text_never_panics(s in ".*") {
            for primitive in [
                PrimitiveType::Integer,
                PrimitiveType::Long,
                PrimitiveType::Float,
                PrimitiveType::Double,
                PrimitiveType::Boolean,
                PrimitiveType::Uuid,
            ] {
                let _ = coerce(&[s.as_str()], &query(primitive));
            }
            let _ = coerce(&[s.as_str()], &array(PrimitiveType::Integer, Some(CollectionFormat::Pipes)));
        }

        #[test]
        fn prop_csv_preserves_order(items in proptest::collection::vec("[a-z]{1,8}", 1..8)) {
            let joined = items.join(",");
            let expected: Vec<&str> = items.iter().map(String::as_str).collect();
            prop_assert_eq!(
                coerce(&[joined], &array(PrimitiveType::String, Some(CollectionFormat::Csv))),
                Some(strings(&expected))
            );
        }
    }
}
