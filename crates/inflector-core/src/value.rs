//! Typed argument values handed to operation handlers.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

/// A coerced parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Text (also e-mail, dates and other textual formats).
    String(String),
    /// 32-bit integer.
    Integer(i32),
    /// 64-bit integer.
    Long(i64),
    /// 32-bit float.
    Float(f32),
    /// 64-bit float.
    Double(f64),
    /// Boolean.
    Boolean(bool),
    /// UUID.
    Uuid(Uuid),
    /// Array of coerced items.
    Array(Vec<ParamValue>),
    /// Decoded body model.
    Model(Value),
    /// Raw uploaded content.
    File(Bytes),
}

impl ParamValue {
    /// Returns the text of a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns any integral value widened to `i64`.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v as i64),
            Self::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns any numeric value as `f64`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(v) => Some(f64::from(*v)),
            Self::Long(v) => Some(*v as f64),
            Self::Float(v) => Some(f64::from(*v)),
            Self::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns a boolean value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns a UUID value.
    #[must_use]
    pub const fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Self::Uuid(u) => Some(*u),
            _ => None,
        }
    }

    /// Returns the items of an array value.
    #[must_use]
    pub fn as_array(&self) -> Option<&[ParamValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the raw content of a file value.
    #[must_use]
    pub const fn as_file(&self) -> Option<&Bytes> {
        match self {
            Self::File(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Converts to a JSON value.
    ///
    /// Files become their UTF-8 text (lossy).
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::String(s) => Value::String(s.clone()),
            Self::Integer(v) => Value::from(*v),
            Self::Long(v) => Value::from(*v),
            Self::Float(v) => Value::from(f64::from(*v)),
            Self::Double(v) => Value::from(*v),
            Self::Boolean(b) => Value::Bool(*b),
            Self::Uuid(u) => Value::String(u.to_string()),
            Self::Array(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Model(value) => value.clone(),
            Self::File(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        }
    }
}

/// The typed arguments of one invocation, aligned with the operation's
/// declared parameters.
///
/// A slot is `None` when the value was absent or could not be coerced.
///
/// # Example
///
/// ```
/// use inflector_core::value::{Arguments, ParamValue};
///
/// let args = Arguments::new(vec![
///     ("petId".to_string(), Some(ParamValue::Long(42))),
///     ("name".to_string(), None),
/// ]);
///
/// assert_eq!(args.i64("petId"), Some(42));
/// assert!(args.get("name").is_none());
/// assert_eq!(args.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    slots: Vec<(String, Option<ParamValue>)>,
}

impl Arguments {
    /// Creates arguments from `(name, value)` pairs in declaration order.
    #[must_use]
    pub fn new(slots: Vec<(String, Option<ParamValue>)>) -> Self {
        Self { slots }
    }

    /// Returns the number of slots (one per declared parameter).
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` when the operation declares no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns the value at a slot position.
    #[must_use]
    pub fn at(&self, index: usize) -> Option<&ParamValue> {
        self.slots.get(index).and_then(|(_, value)| value.as_ref())
    }

    /// Returns the value of a parameter by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.slots
            .iter()
            .find(|(slot, _)| slot == name)
            .and_then(|(_, value)| value.as_ref())
    }

    /// Returns a string parameter.
    #[must_use]
    pub fn string(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ParamValue::as_str)
    }

    /// Returns a 32-bit integer parameter.
    #[must_use]
    pub fn i32(&self, name: &str) -> Option<i32> {
        match self.get(name)? {
            ParamValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns an integral parameter widened to `i64`.
    #[must_use]
    pub fn i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(ParamValue::as_i64)
    }

    /// Returns a numeric parameter as `f64`.
    #[must_use]
    pub fn f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(ParamValue::as_f64)
    }

    /// Returns a boolean parameter.
    #[must_use]
    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(ParamValue::as_bool)
    }

    /// Returns a UUID parameter.
    #[must_use]
    pub fn uuid(&self, name: &str) -> Option<Uuid> {
        self.get(name).and_then(ParamValue::as_uuid)
    }

    /// Returns the items of an array parameter.
    #[must_use]
    pub fn list(&self, name: &str) -> Option<&[ParamValue]> {
        self.get(name).and_then(ParamValue::as_array)
    }

    /// Returns the raw content of a file parameter.
    #[must_use]
    pub fn file(&self, name: &str) -> Option<&Bytes> {
        self.get(name).and_then(ParamValue::as_file)
    }

    /// Deserializes a body parameter into a typed model.
    ///
    /// Returns `None` if the parameter is absent, `Some(Err(_))` if the body
    /// does not fit `T`.
    pub fn model<T: DeserializeOwned>(&self, name: &str) -> Option<Result<T, serde_json::Error>> {
        match self.get(name)? {
            ParamValue::Model(value) => Some(serde_json::from_value(value.clone())),
            other => Some(serde_json::from_value(other.to_json())),
        }
    }

    /// Iterates over `(name, value)` slots in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&ParamValue>)> {
        self.slots
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_ref()))
    }
}
