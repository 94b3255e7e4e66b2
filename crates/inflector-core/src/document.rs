//! Swagger 2.0 document loading.
//!
//! Documents are read into a [`serde_json::Value`] first (YAML goes through
//! `serde_yaml` into the same value type), then walked into a [`Contract`].
//! The value is kept on the contract so it can be served back unchanged.

use crate::contract::{
    CollectionFormat, Contract, Operation, OperationBuilder, Parameter, ParameterLocation,
    ParameterType, PrimitiveType, ResponseSpec,
};
use crate::error::{InflectorError, InflectorResult};
use crate::schema::{ModelRegistry, ObjectSchema, PrimitiveSchema, Schema};
use http::Method;
use serde_json::{Map, Value};
use std::path::Path;

const PARAMETERS_PREFIX: &str = "#/parameters/";
const RESPONSES_PREFIX: &str = "#/responses/";

/// Methods a path item may declare, in registration order.
const PATH_METHODS: [(&str, Method); 7] = [
    ("get", Method::GET),
    ("post", Method::POST),
    ("put", Method::PUT),
    ("delete", Method::DELETE),
    ("options", Method::OPTIONS),
    ("patch", Method::PATCH),
    ("head", Method::HEAD),
];

impl Contract {
    /// Loads a contract from a file.
    ///
    /// `.json` files are parsed as JSON, `.yaml`/`.yml` as YAML; any other
    /// extension is tried as JSON first, then YAML.
    pub fn from_path(path: impl AsRef<Path>) -> InflectorResult<Self> {
        let path = path.as_ref();
        let location = path.display().to_string();
        let content = std::fs::read_to_string(path)
            .map_err(|e| InflectorError::contract_load(&location, e.to_string()))?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let document = match extension.as_deref() {
            Some("json") => parse_json(&content, &location)?,
            Some("yaml" | "yml") => parse_yaml(&content, &location)?,
            _ => parse_json(&content, &location).or_else(|_| parse_yaml(&content, &location))?,
        };
        Self::from_document(document, &location)
    }

    /// Parses a contract from JSON text.
    pub fn from_json_str(content: &str) -> InflectorResult<Self> {
        let document = parse_json(content, "<json>")?;
        Self::from_document(document, "<json>")
    }

    /// Parses a contract from YAML text.
    pub fn from_yaml_str(content: &str) -> InflectorResult<Self> {
        let document = parse_yaml(content, "<yaml>")?;
        Self::from_document(document, "<yaml>")
    }

    /// Builds a contract from an already parsed document.
    pub fn from_value(document: Value) -> InflectorResult<Self> {
        Self::from_document(document, "<value>")
    }

    fn from_document(document: Value, location: &str) -> InflectorResult<Self> {
        let loader = Loader {
            root: &document,
            location,
        };
        let root = document
            .as_object()
            .ok_or_else(|| loader.error("document is not an object"))?;

        match root.get("swagger").and_then(Value::as_str) {
            Some("2.0") => {}
            Some(other) => return Err(loader.error(format!("unsupported swagger version {other}"))),
            None => return Err(loader.error("missing `swagger: \"2.0\"` marker")),
        }

        let info = root.get("info");
        let title = info
            .and_then(|i| i.get("title"))
            .and_then(Value::as_str)
            .unwrap_or("");
        let version = info
            .and_then(|i| i.get("version"))
            .and_then(Value::as_str)
            .unwrap_or("0.0.0");

        let mut builder = Contract::builder(title).version(version);
        if let Some(base_path) = root.get("basePath").and_then(Value::as_str) {
            builder = builder.base_path(base_path);
        }

        let mut models = ModelRegistry::new();
        if let Some(definitions) = root.get("definitions").and_then(Value::as_object) {
            for (name, schema) in definitions {
                models.insert(name.clone(), parse_schema(schema));
            }
        }
        builder = builder.models(models);

        let global_consumes = string_list(root.get("consumes"));
        let global_produces = string_list(root.get("produces"));

        if let Some(paths) = root.get("paths").and_then(Value::as_object) {
            for (path, item) in paths {
                let Some(item) = item.as_object() else {
                    return Err(loader.error(format!("path item {path} is not an object")));
                };
                let shared = loader.parameters(item.get("parameters"), path)?;
                for (field, method) in &PATH_METHODS {
                    let Some(operation) = item.get(*field) else {
                        continue;
                    };
                    let operation = loader.operation(
                        method.clone(),
                        path,
                        operation,
                        &shared,
                        &global_consumes,
                        &global_produces,
                    )?;
                    tracing::debug!(operation = %operation.key(), "loaded operation");
                    builder = builder.operation(operation);
                }
            }
        }

        let contract = builder.document(document).build();
        tracing::info!(
            title = contract.title(),
            version = contract.version(),
            operations = contract.operations().len(),
            models = contract.models().len(),
            "contract loaded"
        );
        Ok(contract)
    }
}

fn parse_json(content: &str, location: &str) -> InflectorResult<Value> {
    serde_json::from_str(content)
        .map_err(|e| InflectorError::contract_load(location, format!("invalid JSON: {e}")))
}

fn parse_yaml(content: &str, location: &str) -> InflectorResult<Value> {
    serde_yaml::from_str(content)
        .map_err(|e| InflectorError::contract_load(location, format!("invalid YAML: {e}")))
}

struct Loader<'a> {
    root: &'a Value,
    location: &'a str,
}

impl<'a> Loader<'a> {
    fn error(&self, message: impl Into<String>) -> InflectorError {
        InflectorError::contract_load(self.location, message)
    }

    fn operation(
        &self,
        method: Method,
        path: &str,
        value: &Value,
        shared: &[Parameter],
        global_consumes: &[String],
        global_produces: &[String],
    ) -> InflectorResult<Operation> {
        let Some(object) = value.as_object() else {
            return Err(self.error(format!("operation {method} {path} is not an object")));
        };

        let mut builder = OperationBuilder::new(method, path);
        if let Some(id) = object.get("operationId").and_then(Value::as_str) {
            builder = builder.operation_id(id);
        }
        if let Some(summary) = object.get("summary").and_then(Value::as_str) {
            builder = builder.summary(summary);
        }
        if let Some(description) = object.get("description").and_then(Value::as_str) {
            builder = builder.description(description);
        }
        for tag in string_list(object.get("tags")) {
            builder = builder.tag(tag);
        }

        let consumes = object
            .get("consumes")
            .map_or_else(|| global_consumes.to_vec(), |v| string_list(Some(v)));
        for media_type in consumes {
            builder = builder.consumes(media_type);
        }
        let produces = object
            .get("produces")
            .map_or_else(|| global_produces.to_vec(), |v| string_list(Some(v)));
        for media_type in produces {
            builder = builder.produces(media_type);
        }

        // Operation-level parameters override path-level ones with the same name and location.
        let own = self.parameters(object.get("parameters"), path)?;
        let mut merged: Vec<Parameter> = shared
            .iter()
            .filter(|p| {
                !own.iter()
                    .any(|o| o.name() == p.name() && o.location() == p.location())
            })
            .cloned()
            .collect();
        merged.extend(own);
        builder = builder.parameters(merged);

        if let Some(responses) = object.get("responses").and_then(Value::as_object) {
            for (key, response) in responses {
                if key.starts_with("x-") {
                    continue;
                }
                builder = builder.response(key.clone(), self.response(response)?);
            }
        }

        for (key, value) in object {
            if key.starts_with("x-") {
                builder = builder.extension(key.clone(), value.clone());
            }
        }

        Ok(builder.build())
    }

    fn parameters(&self, value: Option<&Value>, path: &str) -> InflectorResult<Vec<Parameter>> {
        let Some(list) = value else {
            return Ok(Vec::new());
        };
        let Some(list) = list.as_array() else {
            return Err(self.error(format!("parameters of {path} are not a list")));
        };
        list.iter().map(|p| self.parameter(p, path)).collect()
    }

    fn parameter(&self, value: &Value, path: &str) -> InflectorResult<Parameter> {
        let value = self.follow(value, PARAMETERS_PREFIX)?;
        let name = value
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| self.error(format!("parameter without name in {path}")))?;
        let location = value
            .get("in")
            .and_then(Value::as_str)
            .and_then(ParameterLocation::parse)
            .ok_or_else(|| self.error(format!("parameter {name} in {path} has no valid `in`")))?;

        let param_type = if location == ParameterLocation::Body {
            let schema = value.get("schema").map_or_else(Schema::any, parse_schema);
            ParameterType::Body { schema }
        } else {
            let kind = value.get("type").and_then(Value::as_str).unwrap_or("string");
            let format = value.get("format").and_then(Value::as_str);
            match kind {
                "file" => ParameterType::File,
                "array" => {
                    let items = value.get("items");
                    let item_kind = items
                        .and_then(|i| i.get("type"))
                        .and_then(Value::as_str)
                        .unwrap_or("string");
                    let item_format = items.and_then(|i| i.get("format")).and_then(Value::as_str);
                    ParameterType::Array {
                        items: PrimitiveType::from_swagger(item_kind, item_format)
                            .unwrap_or(PrimitiveType::String),
                        collection_format: value
                            .get("collectionFormat")
                            .and_then(Value::as_str)
                            .and_then(CollectionFormat::parse),
                    }
                }
                other => ParameterType::Primitive {
                    primitive: PrimitiveType::from_swagger(other, format)
                        .unwrap_or(PrimitiveType::String),
                },
            }
        };

        let mut parameter = Parameter::new(name, location, param_type);
        if let Some(required) = value.get("required").and_then(Value::as_bool) {
            parameter = parameter.with_required(required || location == ParameterLocation::Path);
        }
        if let Some(description) = value.get("description").and_then(Value::as_str) {
            parameter = parameter.with_description(description);
        }
        Ok(parameter)
    }

    fn response(&self, value: &Value) -> InflectorResult<ResponseSpec> {
        let value = self.follow(value, RESPONSES_PREFIX)?;
        let mut spec = ResponseSpec::new(
            value
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or(""),
        );
        if let Some(schema) = value.get("schema") {
            spec = spec.with_schema(parse_schema(schema));
        }
        if let Some(examples) = value.get("examples").and_then(Value::as_object) {
            for (media_type, example) in examples {
                spec = spec.with_example(media_type.clone(), example.clone());
            }
        }
        Ok(spec)
    }

    /// Resolves a `$ref` into the shared `parameters`/`responses` sections.
    fn follow<'v>(&self, value: &'v Value, prefix: &str) -> InflectorResult<&'v Value>
    where
        'a: 'v,
    {
        let Some(reference) = value.get("$ref").and_then(Value::as_str) else {
            return Ok(value);
        };
        let section = prefix.trim_start_matches("#/").trim_end_matches('/');
        let name = reference
            .strip_prefix(prefix)
            .ok_or_else(|| self.error(format!("unsupported reference {reference}")))?;
        self.root
            .get(section)
            .and_then(|s| s.get(name))
            .ok_or_else(|| self.error(format!("unresolvable reference {reference}")))
    }
}

/// Converts a Swagger schema object into a [`Schema`].
///
/// Unknown or missing types become [`Schema::Any`]; schema parsing never
/// fails, so a sloppy model cannot prevent the contract from loading.
#[must_use]
pub fn parse_schema(value: &Value) -> Schema {
    let Some(object) = value.as_object() else {
        return Schema::any();
    };
    if let Some(reference) = object.get("$ref").and_then(Value::as_str) {
        return Schema::reference(reference);
    }

    let example = object.get("example").cloned();

    if let Some(parts) = object.get("allOf").and_then(Value::as_array) {
        return Schema::Composed {
            all_of: parts.iter().map(parse_schema).collect(),
            example,
        };
    }

    let kind = object.get("type").and_then(Value::as_str);
    match kind {
        Some("array") => Schema::Array {
            items: Box::new(object.get("items").map_or_else(Schema::any, parse_schema)),
            example,
        },
        Some("object") => Schema::Object(parse_object(object, example)),
        None if object.contains_key("properties") || object.contains_key("additionalProperties") => {
            Schema::Object(parse_object(object, example))
        }
        Some("file") => Schema::Primitive(PrimitiveSchema {
            kind: PrimitiveType::Binary,
            enum_values: Vec::new(),
            default: object.get("default").cloned(),
            example,
        }),
        Some(other) => match PrimitiveType::from_swagger(
            other,
            object.get("format").and_then(Value::as_str),
        ) {
            Some(primitive) => Schema::Primitive(PrimitiveSchema {
                kind: primitive,
                enum_values: object
                    .get("enum")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default(),
                default: object.get("default").cloned(),
                example,
            }),
            None => Schema::Any { example },
        },
        None => Schema::Any { example },
    }
}

fn parse_object(object: &Map<String, Value>, example: Option<Value>) -> ObjectSchema {
    let properties = object
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| {
            props
                .iter()
                .map(|(name, schema)| (name.clone(), parse_schema(schema)))
                .collect()
        })
        .unwrap_or_default();
    let additional_properties = object
        .get("additionalProperties")
        .filter(|v| v.is_object())
        .map(|v| Box::new(parse_schema(v)));
    ObjectSchema {
        properties,
        required: string_list(object.get("required")),
        additional_properties,
        example,
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::PETSTORE_YAML;
    use serde_json::json;

    // ==================== Loading Tests ====================

    #[test]
    fn test_load_petstore_yaml() {
        let contract = Contract::from_yaml_str(PETSTORE_YAML).expect("fixture should load");
        assert_eq!(contract.title(), "Swagger Petstore");
        assert_eq!(contract.base_path(), "/v2");
        assert!(contract.models().contains("Pet"));
        assert!(contract.models().contains("Category"));

        let op = contract
            .find_by_operation_id("findPetsByStatus")
            .expect("operation exists");
        assert_eq!(op.method(), Method::GET);
        let status = &op.parameters()[0];
        assert_eq!(status.location(), ParameterLocation::Query);
        assert!(status.is_required());
        assert_eq!(
            status.param_type(),
            &ParameterType::Array {
                items: PrimitiveType::String,
                collection_format: Some(CollectionFormat::Csv),
            }
        );
    }

    #[test]
    fn test_json_and_yaml_agree() {
        let yaml = Contract::from_yaml_str(PETSTORE_YAML).expect("yaml");
        let json_text = serde_json::to_string(yaml.document()).expect("serialize");
        let json = Contract::from_json_str(&json_text).expect("json");
        assert_eq!(yaml.operations().len(), json.operations().len());
        assert_eq!(yaml.models().len(), json.models().len());
    }

    #[test]
    fn test_path_level_parameters_are_merged() {
        let document = json!({
            "swagger": "2.0",
            "info": { "title": "t", "version": "1" },
            "paths": {
                "/pets/{petId}": {
                    "parameters": [
                        { "name": "petId", "in": "path", "required": true, "type": "string" },
                        { "name": "trace", "in": "header", "type": "string" }
                    ],
                    "get": {
                        "parameters": [
                            { "name": "petId", "in": "path", "required": true, "type": "integer", "format": "int64" }
                        ],
                        "responses": { "200": { "description": "ok" } }
                    }
                }
            }
        });
        let contract = Contract::from_value(document).expect("loads");
        let op = &contract.operations()[0];
        let names: Vec<&str> = op.parameters().iter().map(Parameter::name).collect();
        assert_eq!(names, vec!["trace", "petId"]);
        assert_eq!(
            op.parameters()[1].param_type(),
            &ParameterType::Primitive {
                primitive: PrimitiveType::Long
            }
        );
    }

    #[test]
    fn test_parameter_and_response_references() {
        let document = json!({
            "swagger": "2.0",
            "info": { "title": "t", "version": "1" },
            "parameters": {
                "limit": { "name": "limit", "in": "query", "type": "integer" }
            },
            "responses": {
                "Problem": { "description": "problem", "schema": { "type": "string" } }
            },
            "paths": {
                "/pets": {
                    "get": {
                        "parameters": [ { "$ref": "#/parameters/limit" } ],
                        "responses": { "default": { "$ref": "#/responses/Problem" } }
                    }
                }
            }
        });
        let contract = Contract::from_value(document).expect("loads");
        let op = &contract.operations()[0];
        assert_eq!(op.parameters()[0].name(), "limit");
        assert_eq!(op.responses()["default"].description, "problem");
    }

    #[test]
    fn test_vendor_extensions_kept() {
        let document = json!({
            "swagger": "2.0",
            "info": { "title": "t", "version": "1" },
            "paths": {
                "/pets": {
                    "get": {
                        "x-swagger-router-controller": "Pets",
                        "responses": { "200": { "description": "ok" } }
                    }
                }
            }
        });
        let contract = Contract::from_value(document).expect("loads");
        assert_eq!(
            contract.operations()[0].extension("x-swagger-router-controller"),
            Some(&json!("Pets"))
        );
    }

    // ==================== Failure Tests ====================

    #[test]
    fn test_rejects_openapi_3() {
        let err = Contract::from_value(json!({ "openapi": "3.0.0", "paths": {} }))
            .expect_err("should reject");
        assert!(matches!(err, InflectorError::ContractLoad { .. }));
    }

    #[test]
    fn test_rejects_malformed_yaml() {
        let err = Contract::from_yaml_str("swagger: [unclosed").expect_err("should reject");
        assert!(err.to_string().contains("invalid YAML"));
    }

    #[test]
    fn test_rejects_dangling_parameter_reference() {
        let document = json!({
            "swagger": "2.0",
            "info": { "title": "t", "version": "1" },
            "paths": {
                "/pets": {
                    "get": {
                        "parameters": [ { "$ref": "#/parameters/nope" } ],
                        "responses": {}
                    }
                }
            }
        });
        let err = Contract::from_value(document).expect_err("should reject");
        assert!(err.to_string().contains("#/parameters/nope"));
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = Contract::from_path("/definitely/not/here/swagger.yaml").expect_err("missing");
        assert!(err.to_string().contains("swagger.yaml"));
    }

    #[test]
    fn test_from_path_by_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("swagger.yml");
        std::fs::write(&path, PETSTORE_YAML).expect("write");
        let contract = Contract::from_path(&path).expect("loads");
        assert!(!contract.operations().is_empty());
    }

    // ==================== Schema Tests ====================

    #[test]
    fn test_parse_schema_variants() {
        assert_eq!(
            parse_schema(&json!({ "$ref": "#/definitions/Pet" })),
            Schema::reference("Pet")
        );
        assert!(matches!(
            parse_schema(&json!({ "type": "array", "items": { "type": "string" } })),
            Schema::Array { .. }
        ));
        assert!(matches!(
            parse_schema(&json!({ "properties": { "a": { "type": "integer" } } })),
            Schema::Object(_)
        ));
        assert!(matches!(
            parse_schema(&json!({ "allOf": [ { "$ref": "#/definitions/Pet" } ] })),
            Schema::Composed { .. }
        ));
        assert!(matches!(parse_schema(&json!({})), Schema::Any { .. }));
    }

    #[test]
    fn test_parse_schema_keeps_example_and_enum() {
        let schema = parse_schema(&json!({
            "type": "string",
            "enum": ["available", "pending", "sold"],
            "example": "pending"
        }));
        let Schema::Primitive(primitive) = schema else {
            panic!("expected primitive");
        };
        assert_eq!(primitive.enum_values.len(), 3);
        assert_eq!(primitive.example, Some(json!("pending")));
    }
}
