//! Example synthesis.
//!
//! Builds a representative value for a schema so that operations without a
//! handler can still answer with a structurally valid body. Author-declared
//! examples always win over generated values.
//!
//! Named models may reference each other. The synthesizer tracks the models
//! on the current resolution path; re-entering one of them yields `None` for
//! that branch, and object properties without a value are left out.
//!
//! # Example
//!
//! ```
//! use inflector_core::example::synthesize;
//! use inflector_core::schema::{ModelRegistry, Schema};
//! use serde_json::json;
//!
//! let mut models = ModelRegistry::new();
//! models.insert(
//!     "Category",
//!     Schema::object(vec![("id", Schema::long()), ("name", Schema::string())]),
//! );
//!
//! let value = synthesize(&Schema::array(Schema::reference("Category")), &models);
//! assert_eq!(value, Some(json!([{ "id": 0, "name": "string" }])));
//! ```

use crate::contract::PrimitiveType;
use crate::schema::{ModelRegistry, ObjectSchema, PrimitiveSchema, Schema};
use serde_json::{Map, Value};

/// Default limit on schema nesting.
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// Synthesizes an example for `schema`, resolving references through `models`.
#[must_use]
pub fn synthesize(schema: &Schema, models: &ModelRegistry) -> Option<Value> {
    ExampleSynthesizer::new(models).synthesize(schema)
}

/// Representative value for a scalar type.
#[must_use]
pub fn sample_primitive(kind: PrimitiveType) -> Value {
    match kind {
        PrimitiveType::String => Value::from("string"),
        PrimitiveType::Email => Value::from("user@example.com"),
        PrimitiveType::Uuid => Value::from("3fa85f64-5717-4562-b3fc-2c963f66afa6"),
        PrimitiveType::Date => Value::from("2015-07-20"),
        PrimitiveType::DateTime => Value::from("2015-07-20T15:49:04-07:00"),
        PrimitiveType::Password => Value::from("********"),
        PrimitiveType::Byte => Value::from("Ynl0ZXM="),
        PrimitiveType::Binary => Value::from("binary"),
        PrimitiveType::Integer | PrimitiveType::Long => Value::from(0),
        PrimitiveType::Float => Value::from(1.1),
        PrimitiveType::Double => Value::from(3.149),
        PrimitiveType::Boolean => Value::Bool(true),
    }
}

/// Walks schemas and builds example values.
#[derive(Debug, Clone)]
pub struct ExampleSynthesizer<'a> {
    models: &'a ModelRegistry,
    max_depth: usize,
}

impl<'a> ExampleSynthesizer<'a> {
    /// Creates a synthesizer over a model registry.
    #[must_use]
    pub const fn new(models: &'a ModelRegistry) -> Self {
        Self {
            models,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the nesting limit. Branches deeper than this yield `None`.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Synthesizes an example value.
    ///
    /// Returns `None` when nothing sensible can be produced, for instance a
    /// reference to an unknown model or a schema that is nothing but a cycle.
    #[must_use]
    pub fn synthesize(&self, schema: &Schema) -> Option<Value> {
        let mut path = Vec::new();
        self.walk(schema, &mut path, 0)
    }

    fn walk(&self, schema: &Schema, path: &mut Vec<&'a str>, depth: usize) -> Option<Value> {
        if let Some(example) = schema.example() {
            return Some(example.clone());
        }
        if depth > self.max_depth {
            tracing::trace!(depth, "example depth limit reached");
            return None;
        }

        match schema {
            Schema::Ref { name } => self.walk_ref(name, path, depth),
            Schema::Object(object) => Some(Value::Object(self.walk_object(object, path, depth))),
            Schema::Array { items, .. } => {
                let item = self.walk(items, path, depth + 1)?;
                Some(Value::Array(vec![item]))
            }
            Schema::Primitive(primitive) => Some(primitive_example(primitive)),
            Schema::Composed { all_of, .. } => {
                let mut merged = Map::new();
                for part in all_of {
                    match self.walk(part, path, depth + 1) {
                        Some(Value::Object(fields)) => merged.extend(fields),
                        Some(_) | None => {}
                    }
                }
                Some(Value::Object(merged))
            }
            Schema::Any { .. } => Some(Value::Object(Map::new())),
        }
    }

    fn walk_ref(&self, name: &str, path: &mut Vec<&'a str>, depth: usize) -> Option<Value> {
        let Some((model_name, model)) = self.lookup(name) else {
            tracing::debug!(model = name, "example references unknown model");
            return None;
        };
        if path.contains(&model_name) {
            tracing::trace!(model = model_name, "model cycle cut");
            return None;
        }
        path.push(model_name);
        let value = self.walk(model, path, depth + 1);
        path.pop();
        value
    }

    fn walk_object(
        &self,
        object: &ObjectSchema,
        path: &mut Vec<&'a str>,
        depth: usize,
    ) -> Map<String, Value> {
        let mut fields = Map::new();
        for (name, property) in &object.properties {
            if let Some(value) = self.walk(property, path, depth + 1) {
                fields.insert(name.clone(), value);
            }
        }
        if let Some(values) = &object.additional_properties {
            if let Some(value) = self.walk(values, path, depth + 1) {
                fields.insert("key".to_string(), value);
            }
        }
        fields
    }

    fn lookup(&self, name: &str) -> Option<(&'a str, &'a Schema)> {
        let models: &'a ModelRegistry = self.models;
        models.get_key_value(name)
    }
}

fn primitive_example(primitive: &PrimitiveSchema) -> Value {
    if let Some(default) = &primitive.default {
        return default.clone();
    }
    if let Some(first) = primitive.enum_values.first() {
        return first.clone();
    }
    sample_primitive(primitive.kind)
}
