//! Schema types for body parameters and response payloads.
//!
//! Schemas are a structural description of a value. Named models live in a
//! contract-wide [`ModelRegistry`] and are referenced by name; a model may
//! reference itself or another model that references it back, so consumers
//! must treat [`Schema::Ref`] as a possible cycle.
//!
//! # Example
//!
//! ```
//! use inflector_core::schema::{ModelRegistry, Schema};
//!
//! let mut models = ModelRegistry::new();
//! models.insert(
//!     "Pet",
//!     Schema::object(vec![
//!         ("id", Schema::long()),
//!         ("name", Schema::string().with_example(serde_json::json!("doggie"))),
//!         ("owner", Schema::reference("Owner")),
//!     ])
//!     .with_required(vec!["name"]),
//! );
//!
//! assert!(models.get("Pet").is_some());
//! assert!(models.resolve(&Schema::reference("#/definitions/Pet")).is_some());
//! ```

use crate::contract::PrimitiveType;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Prefix of local model references.
pub const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Returns the model name a reference points at.
///
/// Both `#/definitions/Pet` and the short form `Pet` name the model `Pet`.
#[must_use]
pub fn ref_name(reference: &str) -> &str {
    reference
        .strip_prefix(DEFINITIONS_PREFIX)
        .unwrap_or(reference)
}

/// A structural schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Schema {
    /// Reference to a named model in the registry.
    Ref {
        /// The model name (without the `#/definitions/` prefix).
        name: String,
    },
    /// Object with named properties.
    Object(ObjectSchema),
    /// Homogeneous array.
    Array {
        /// Item schema.
        items: Box<Schema>,
        /// Author-declared example.
        example: Option<Value>,
    },
    /// Scalar value.
    Primitive(PrimitiveSchema),
    /// `allOf` composition, merged property-wise.
    Composed {
        /// The composed parts.
        all_of: Vec<Schema>,
        /// Author-declared example.
        example: Option<Value>,
    },
    /// Untyped value.
    Any {
        /// Author-declared example.
        example: Option<Value>,
    },
}

/// An object schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ObjectSchema {
    /// Properties in declaration order.
    pub properties: IndexMap<String, Schema>,
    /// Names of required properties.
    pub required: Vec<String>,
    /// Value schema for map-like objects.
    pub additional_properties: Option<Box<Schema>>,
    /// Author-declared example.
    pub example: Option<Value>,
}

/// A scalar schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrimitiveSchema {
    /// Scalar type.
    pub kind: PrimitiveType,
    /// Allowed values, if enumerated.
    pub enum_values: Vec<Value>,
    /// Declared default.
    pub default: Option<Value>,
    /// Author-declared example.
    pub example: Option<Value>,
}

impl Schema {
    /// Creates a reference to a named model.
    ///
    /// Accepts either the bare name or a `#/definitions/...` pointer.
    #[must_use]
    pub fn reference(name: impl AsRef<str>) -> Self {
        Self::Ref {
            name: ref_name(name.as_ref()).to_string(),
        }
    }

    /// Creates a scalar schema of the given type.
    #[must_use]
    pub fn primitive(kind: PrimitiveType) -> Self {
        Self::Primitive(PrimitiveSchema {
            kind,
            enum_values: Vec::new(),
            default: None,
            example: None,
        })
    }

    /// Creates a string schema.
    #[must_use]
    pub fn string() -> Self {
        Self::primitive(PrimitiveType::String)
    }

    /// Creates a 32-bit integer schema.
    #[must_use]
    pub fn integer() -> Self {
        Self::primitive(PrimitiveType::Integer)
    }

    /// Creates a 64-bit integer schema.
    #[must_use]
    pub fn long() -> Self {
        Self::primitive(PrimitiveType::Long)
    }

    /// Creates a double schema.
    #[must_use]
    pub fn double() -> Self {
        Self::primitive(PrimitiveType::Double)
    }

    /// Creates a boolean schema.
    #[must_use]
    pub fn boolean() -> Self {
        Self::primitive(PrimitiveType::Boolean)
    }

    /// Creates an array schema.
    #[must_use]
    pub fn array(items: Schema) -> Self {
        Self::Array {
            items: Box::new(items),
            example: None,
        }
    }

    /// Creates an object schema from a list of property definitions.
    #[must_use]
    pub fn object(properties: Vec<(&str, Schema)>) -> Self {
        Self::Object(ObjectSchema {
            properties: properties
                .into_iter()
                .map(|(name, schema)| (name.to_string(), schema))
                .collect(),
            ..ObjectSchema::default()
        })
    }

    /// Creates a map schema whose values follow `values`.
    #[must_use]
    pub fn map(values: Schema) -> Self {
        Self::Object(ObjectSchema {
            additional_properties: Some(Box::new(values)),
            ..ObjectSchema::default()
        })
    }

    /// Creates an untyped schema.
    #[must_use]
    pub fn any() -> Self {
        Self::Any { example: None }
    }

    /// Sets the required property names of an object schema.
    ///
    /// Has no effect on other schema kinds.
    #[must_use]
    pub fn with_required(mut self, names: Vec<&str>) -> Self {
        if let Self::Object(object) = &mut self {
            object.required = names.into_iter().map(ToString::to_string).collect();
        }
        self
    }

    /// Sets the enumerated values of a scalar schema.
    #[must_use]
    pub fn with_enum(mut self, values: Vec<Value>) -> Self {
        if let Self::Primitive(primitive) = &mut self {
            primitive.enum_values = values;
        }
        self
    }

    /// Attaches an author-declared example.
    ///
    /// References carry no example of their own; the call is ignored for them.
    #[must_use]
    pub fn with_example(mut self, value: Value) -> Self {
        match &mut self {
            Self::Ref { .. } => {}
            Self::Object(object) => object.example = Some(value),
            Self::Primitive(primitive) => primitive.example = Some(value),
            Self::Array { example, .. } | Self::Composed { example, .. } | Self::Any { example } => {
                *example = Some(value);
            }
        }
        self
    }

    /// Returns the author-declared example, if any.
    #[must_use]
    pub fn example(&self) -> Option<&Value> {
        match self {
            Self::Ref { .. } => None,
            Self::Object(object) => object.example.as_ref(),
            Self::Primitive(primitive) => primitive.example.as_ref(),
            Self::Array { example, .. } | Self::Composed { example, .. } | Self::Any { example } => {
                example.as_ref()
            }
        }
    }

    /// Returns the referenced model name for [`Schema::Ref`].
    #[must_use]
    pub fn ref_target(&self) -> Option<&str> {
        match self {
            Self::Ref { name } => Some(name),
            _ => None,
        }
    }
}

/// Contract-wide registry of named models.
///
/// Models are shared and read-only once the contract is loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ModelRegistry {
    models: IndexMap<String, Schema>,
}

impl ModelRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a model.
    pub fn insert(&mut self, name: impl Into<String>, schema: Schema) {
        self.models.insert(name.into(), schema);
    }

    /// Looks up a model by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.models.get(ref_name(name))
    }

    /// Looks up a model, returning the stored name along with it.
    #[must_use]
    pub fn get_key_value(&self, name: &str) -> Option<(&str, &Schema)> {
        self.models
            .get_key_value(ref_name(name))
            .map(|(key, schema)| (key.as_str(), schema))
    }

    /// Follows a reference schema to its model.
    ///
    /// Non-reference schemas resolve to themselves. A reference to an unknown
    /// model resolves to `None`.
    #[must_use]
    pub fn resolve<'a>(&'a self, schema: &'a Schema) -> Option<&'a Schema> {
        match schema {
            Schema::Ref { name } => self.get(name),
            other => Some(other),
        }
    }

    /// Returns `true` if a model with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(ref_name(name))
    }

    /// Returns the model names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    /// Returns the number of models.
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Returns `true` if no models are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ref_name_strips_prefix() {
        assert_eq!(ref_name("#/definitions/Pet"), "Pet");
        assert_eq!(ref_name("Pet"), "Pet");
    }

    #[test]
    fn test_reference_normalizes_pointer() {
        let schema = Schema::reference("#/definitions/Category");
        assert_eq!(schema.ref_target(), Some("Category"));
    }

    #[test]
    fn test_example_roundtrip_on_each_kind() {
        let primitive = Schema::string().with_example(json!("doggie"));
        assert_eq!(primitive.example(), Some(&json!("doggie")));

        let array = Schema::array(Schema::integer()).with_example(json!([1, 2]));
        assert_eq!(array.example(), Some(&json!([1, 2])));

        let reference = Schema::reference("Pet").with_example(json!({}));
        assert_eq!(reference.example(), None);
    }

    #[test]
    fn test_object_keeps_declaration_order() {
        let schema = Schema::object(vec![
            ("zeta", Schema::string()),
            ("alpha", Schema::string()),
        ]);
        let Schema::Object(object) = schema else {
            panic!("expected object schema");
        };
        let names: Vec<&str> = object.properties.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_registry_resolve() {
        let mut models = ModelRegistry::new();
        models.insert("Tag", Schema::object(vec![("name", Schema::string())]));

        assert!(models.contains("#/definitions/Tag"));
        assert!(models.resolve(&Schema::reference("Tag")).is_some());
        assert!(models.resolve(&Schema::reference("Missing")).is_none());
        assert_eq!(models.resolve(&Schema::string()), Some(&Schema::string()));
        assert_eq!(models.len(), 1);
    }
}
