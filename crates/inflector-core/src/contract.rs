//! Contract types.
//!
//! A [`Contract`] is the parsed API description: a list of [`Operation`]s,
//! each identified by an HTTP method and a path template, plus a registry of
//! named models. Contracts are immutable once built and are shared by every
//! request.
//!
//! Contracts are normally loaded from a Swagger 2.0 document (see
//! [`Contract::from_path`]), but can also be assembled with builders:
//!
//! ```
//! use inflector_core::contract::{Contract, Operation, Parameter, PrimitiveType, ResponseSpec};
//! use inflector_core::schema::Schema;
//! use http::Method;
//!
//! let contract = Contract::builder("Petstore")
//!     .version("1.0.0")
//!     .base_path("/v2")
//!     .operation(
//!         Operation::builder(Method::GET, "/pets/{petId}")
//!             .operation_id("getPetById")
//!             .parameter(Parameter::path("petId", PrimitiveType::Long))
//!             .response("200", ResponseSpec::new("ok").with_schema(Schema::reference("Pet")))
//!             .build(),
//!     )
//!     .build();
//!
//! let (operation, params) = contract
//!     .match_operation(&Method::GET, "/v2/pets/42")
//!     .expect("route should match");
//! assert_eq!(operation.operation_id(), Some("getPetById"));
//! assert_eq!(params["petId"], "42");
//! ```

use crate::schema::{ModelRegistry, Schema};
use http::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Path template variables extracted from a request path.
pub type PathParams = HashMap<String, String>;

/// A parsed API contract.
#[derive(Debug, Clone)]
pub struct Contract {
    title: String,
    version: String,
    base_path: String,
    operations: Vec<Operation>,
    models: Arc<ModelRegistry>,
    document: Value,
    /// Operation lookup by method + path template.
    operation_index: HashMap<String, usize>,
}

impl Contract {
    /// Creates a new contract builder.
    #[must_use]
    pub fn builder(title: impl Into<String>) -> ContractBuilder {
        ContractBuilder::new(title)
    }

    /// Returns the contract title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the contract version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the base path every operation path is mounted under.
    ///
    /// Empty when the contract declares none.
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Returns all operations in declaration order.
    #[must_use]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Returns the shared model registry.
    #[must_use]
    pub fn models(&self) -> &Arc<ModelRegistry> {
        &self.models
    }

    /// Returns the source document, for rendering it back to clients.
    #[must_use]
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Looks up an operation by method and declared path template.
    #[must_use]
    pub fn get_operation(&self, method: &Method, path: &str) -> Option<&Operation> {
        self.operation_index
            .get(&operation_key(method, path))
            .map(|&idx| &self.operations[idx])
    }

    /// Looks up an operation by its `operationId`.
    #[must_use]
    pub fn find_by_operation_id(&self, operation_id: &str) -> Option<&Operation> {
        self.operations
            .iter()
            .find(|op| op.operation_id() == Some(operation_id))
    }

    /// Removes the base path from a request path.
    ///
    /// Returns `None` if the request path lives outside the base path.
    #[must_use]
    pub fn strip_base_path<'a>(&self, request_path: &'a str) -> Option<&'a str> {
        if self.base_path.is_empty() {
            return Some(request_path);
        }
        let rest = request_path.strip_prefix(&self.base_path)?;
        if rest.is_empty() {
            Some("/")
        } else if rest.starts_with('/') {
            Some(rest)
        } else {
            None
        }
    }

    /// Finds an operation by HTTP method and request path.
    ///
    /// The request path includes the base path. `HEAD` falls back to the
    /// `GET` operation when the contract declares no `HEAD` operation.
    #[must_use]
    pub fn match_operation(&self, method: &Method, path: &str) -> Option<(&Operation, PathParams)> {
        let relative = self.strip_base_path(path)?;
        let found = self.match_relative(method, relative);
        if found.is_none() && method == Method::HEAD {
            return self.match_relative(&Method::GET, relative);
        }
        found
    }

    /// Returns the methods declared for a request path.
    ///
    /// Used to answer `405 Method Not Allowed` with an `Allow` header.
    #[must_use]
    pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
        let Some(relative) = self.strip_base_path(path) else {
            return Vec::new();
        };
        let mut methods: Vec<Method> = self
            .operations
            .iter()
            .filter(|op| op.match_path(relative).is_some())
            .map(|op| op.method().clone())
            .collect();
        methods.dedup();
        methods
    }

    fn match_relative(&self, method: &Method, relative: &str) -> Option<(&Operation, PathParams)> {
        // Literal segments take precedence over template variables.
        self.operations
            .iter()
            .filter(|op| op.method() == method)
            .filter_map(|op| op.match_path(relative).map(|params| (op, params)))
            .min_by_key(|(op, _)| op.variable_segments())
    }

    fn rebuild_index(&mut self) {
        self.operation_index.clear();
        for (idx, op) in self.operations.iter().enumerate() {
            self.operation_index.insert(op.key(), idx);
        }
    }
}

/// Builder for creating [`Contract`] instances.
#[derive(Debug)]
pub struct ContractBuilder {
    title: String,
    version: String,
    base_path: String,
    operations: Vec<Operation>,
    models: ModelRegistry,
    document: Option<Value>,
}

impl ContractBuilder {
    /// Creates a new contract builder.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: "0.0.0".to_string(),
            base_path: String::new(),
            operations: Vec::new(),
            models: ModelRegistry::new(),
            document: None,
        }
    }

    /// Sets the contract version.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Sets the base path. A lone `/` or trailing slash is dropped.
    #[must_use]
    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        let base_path = base_path.into();
        self.base_path = base_path.trim_end_matches('/').to_string();
        self
    }

    /// Adds an operation.
    #[must_use]
    pub fn operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    /// Adds a named model.
    #[must_use]
    pub fn model(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.models.insert(name, schema);
        self
    }

    /// Replaces the whole model registry.
    #[must_use]
    pub fn models(mut self, models: ModelRegistry) -> Self {
        self.models = models;
        self
    }

    /// Sets the source document served back to clients.
    #[must_use]
    pub fn document(mut self, document: Value) -> Self {
        self.document = Some(document);
        self
    }

    /// Builds the contract.
    ///
    /// Without an explicit source document, a minimal one is generated from
    /// the title, version and base path.
    #[must_use]
    pub fn build(self) -> Contract {
        let base_path = if self.base_path.is_empty() {
            "/"
        } else {
            self.base_path.as_str()
        };
        let document = self.document.unwrap_or_else(|| {
            serde_json::json!({
                "swagger": "2.0",
                "info": { "title": self.title, "version": self.version },
                "basePath": base_path,
                "paths": {},
            })
        });
        let mut contract = Contract {
            title: self.title,
            version: self.version,
            base_path: self.base_path,
            operations: self.operations,
            models: Arc::new(self.models),
            document,
            operation_index: HashMap::new(),
        };
        contract.rebuild_index();
        contract
    }
}

/// Builds the lookup key for a method + path template.
#[must_use]
pub fn operation_key(method: &Method, path: &str) -> String {
    format!("{} {}", method, path)
}

/// Where a parameter is carried in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterLocation {
    /// Query string.
    #[serde(rename = "query")]
    Query,
    /// Path template variable.
    #[serde(rename = "path")]
    Path,
    /// Request header.
    #[serde(rename = "header")]
    Header,
    /// URL-encoded form body.
    #[serde(rename = "formData")]
    FormData,
    /// Whole request body.
    #[serde(rename = "body")]
    Body,
}

impl ParameterLocation {
    /// Returns the name used in contracts and error messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Path => "path",
            Self::Header => "header",
            Self::FormData => "formData",
            Self::Body => "body",
        }
    }

    /// Parses a contract `in` value.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "query" => Some(Self::Query),
            "path" => Some(Self::Path),
            "header" => Some(Self::Header),
            "formData" => Some(Self::FormData),
            "body" => Some(Self::Body),
            _ => None,
        }
    }
}

impl std::fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar types a parameter or schema can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveType {
    /// Free text.
    String,
    /// E-mail address, kept as text.
    Email,
    /// UUID in canonical hyphenated form.
    Uuid,
    /// Calendar date, kept as text.
    Date,
    /// Timestamp, kept as text.
    DateTime,
    /// Password, kept as text.
    Password,
    /// Base64 bytes, kept as text.
    Byte,
    /// Raw binary content.
    Binary,
    /// 32-bit integer.
    Integer,
    /// 64-bit integer.
    Long,
    /// 32-bit float.
    Float,
    /// 64-bit float.
    Double,
    /// Boolean.
    Boolean,
}

impl PrimitiveType {
    /// Maps a Swagger `type` + `format` pair to a primitive type.
    ///
    /// Returns `None` for non-scalar types (`array`, `object`, `file`).
    #[must_use]
    pub fn from_swagger(kind: &str, format: Option<&str>) -> Option<Self> {
        let primitive = match (kind, format) {
            ("integer", Some("int64")) => Self::Long,
            ("integer", _) => Self::Integer,
            ("number", Some("float")) => Self::Float,
            ("number", _) => Self::Double,
            ("boolean", _) => Self::Boolean,
            ("string", Some("uuid")) => Self::Uuid,
            ("string", Some("email")) => Self::Email,
            ("string", Some("date")) => Self::Date,
            ("string", Some("date-time")) => Self::DateTime,
            ("string", Some("password")) => Self::Password,
            ("string", Some("byte")) => Self::Byte,
            ("string", Some("binary")) => Self::Binary,
            ("string", _) => Self::String,
            _ => return None,
        };
        Some(primitive)
    }

    /// Returns `true` for types whose values are carried as plain text.
    #[must_use]
    pub const fn is_textual(&self) -> bool {
        matches!(
            self,
            Self::String
                | Self::Email
                | Self::Date
                | Self::DateTime
                | Self::Password
                | Self::Byte
                | Self::Binary
        )
    }
}

/// How an array parameter is encoded into a single string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionFormat {
    /// Comma separated (`a,b`).
    Csv,
    /// Space separated (`a b`).
    Ssv,
    /// Tab separated.
    Tsv,
    /// Pipe separated (`a|b`).
    Pipes,
    /// One value per repeated parameter.
    Multi,
}

impl CollectionFormat {
    /// Parses a contract `collectionFormat` value.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "csv" => Some(Self::Csv),
            "ssv" => Some(Self::Ssv),
            "tsv" => Some(Self::Tsv),
            "pipes" => Some(Self::Pipes),
            "multi" => Some(Self::Multi),
            _ => None,
        }
    }

    /// Returns the delimiter, or `None` for [`CollectionFormat::Multi`].
    #[must_use]
    pub const fn delimiter(&self) -> Option<char> {
        match self {
            Self::Csv => Some(','),
            Self::Ssv => Some(' '),
            Self::Tsv => Some('\t'),
            Self::Pipes => Some('|'),
            Self::Multi => None,
        }
    }
}

/// Declared type of a parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParameterType {
    /// A single scalar.
    Primitive {
        /// The scalar type.
        primitive: PrimitiveType,
    },
    /// An array of scalars encoded with a collection format.
    Array {
        /// Item type.
        items: PrimitiveType,
        /// Encoding; absent means no encoding was declared.
        collection_format: Option<CollectionFormat>,
    },
    /// Uploaded file content (form parameters only).
    File,
    /// A model decoded from the whole request body.
    Body {
        /// Schema of the body.
        schema: Schema,
    },
}

/// A declared operation parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    name: String,
    location: ParameterLocation,
    required: bool,
    param_type: ParameterType,
    description: Option<String>,
}

impl Parameter {
    /// Creates a parameter.
    ///
    /// Path parameters are always required.
    #[must_use]
    pub fn new(name: impl Into<String>, location: ParameterLocation, param_type: ParameterType) -> Self {
        Self {
            name: name.into(),
            location,
            required: location == ParameterLocation::Path,
            param_type,
            description: None,
        }
    }

    /// Creates an optional scalar query parameter.
    #[must_use]
    pub fn query(name: impl Into<String>, primitive: PrimitiveType) -> Self {
        Self::new(name, ParameterLocation::Query, ParameterType::Primitive { primitive })
    }

    /// Creates a scalar path parameter.
    #[must_use]
    pub fn path(name: impl Into<String>, primitive: PrimitiveType) -> Self {
        Self::new(name, ParameterLocation::Path, ParameterType::Primitive { primitive })
    }

    /// Creates an optional scalar header parameter.
    #[must_use]
    pub fn header(name: impl Into<String>, primitive: PrimitiveType) -> Self {
        Self::new(name, ParameterLocation::Header, ParameterType::Primitive { primitive })
    }

    /// Creates an optional scalar form parameter.
    #[must_use]
    pub fn form(name: impl Into<String>, primitive: PrimitiveType) -> Self {
        Self::new(name, ParameterLocation::FormData, ParameterType::Primitive { primitive })
    }

    /// Creates an optional file form parameter.
    #[must_use]
    pub fn file(name: impl Into<String>) -> Self {
        Self::new(name, ParameterLocation::FormData, ParameterType::File)
    }

    /// Creates an optional body parameter.
    #[must_use]
    pub fn body(name: impl Into<String>, schema: Schema) -> Self {
        Self::new(name, ParameterLocation::Body, ParameterType::Body { schema })
    }

    /// Creates an optional array parameter.
    #[must_use]
    pub fn array(
        name: impl Into<String>,
        location: ParameterLocation,
        items: PrimitiveType,
        collection_format: Option<CollectionFormat>,
    ) -> Self {
        Self::new(
            name,
            location,
            ParameterType::Array {
                items,
                collection_format,
            },
        )
    }

    /// Marks the parameter as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets whether the parameter is required.
    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parameter location.
    #[must_use]
    pub const fn location(&self) -> ParameterLocation {
        self.location
    }

    /// Returns whether a value must be supplied.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Returns the declared type.
    #[must_use]
    pub const fn param_type(&self) -> &ParameterType {
        &self.param_type
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// A declared response.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResponseSpec {
    /// Human-readable description.
    pub description: String,
    /// Payload schema, if the response has a body.
    pub schema: Option<Schema>,
    /// Author-declared examples keyed by media type.
    pub examples: BTreeMap<String, Value>,
}

impl ResponseSpec {
    /// Creates a response without a body.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    /// Sets the payload schema.
    #[must_use]
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Adds an example for a media type.
    #[must_use]
    pub fn with_example(mut self, media_type: impl Into<String>, example: Value) -> Self {
        self.examples.insert(media_type.into(), example);
        self
    }
}

/// An operation defined in a contract.
#[derive(Debug, Clone)]
pub struct Operation {
    operation_id: Option<String>,
    method: Method,
    path: String,
    path_segments: Vec<PathSegment>,
    parameters: Vec<Parameter>,
    /// Sorted by key, which the fallback response selection relies on.
    responses: BTreeMap<String, ResponseSpec>,
    tags: Vec<String>,
    summary: Option<String>,
    description: Option<String>,
    consumes: Vec<String>,
    produces: Vec<String>,
    extensions: BTreeMap<String, Value>,
}

impl Operation {
    /// Creates a new operation builder.
    #[must_use]
    pub fn builder(method: Method, path: impl Into<String>) -> OperationBuilder {
        OperationBuilder::new(method, path)
    }

    /// Returns the `operationId`, if declared.
    #[must_use]
    pub fn operation_id(&self) -> Option<&str> {
        self.operation_id.as_deref()
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the path template, relative to the contract base path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the unique method + path key, e.g. `GET /pets/{petId}`.
    #[must_use]
    pub fn key(&self) -> String {
        operation_key(&self.method, &self.path)
    }

    /// Returns the parameters in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Returns the declared responses, sorted by status key.
    #[must_use]
    pub fn responses(&self) -> &BTreeMap<String, ResponseSpec> {
        &self.responses
    }

    /// Returns the operation tags.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns the summary.
    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the media types the operation accepts.
    #[must_use]
    pub fn consumes(&self) -> &[String] {
        &self.consumes
    }

    /// Returns the media types the operation produces.
    #[must_use]
    pub fn produces(&self) -> &[String] {
        &self.produces
    }

    /// Returns a vendor extension (`x-...`) value.
    #[must_use]
    pub fn extension(&self, name: &str) -> Option<&Value> {
        self.extensions.get(name)
    }

    /// Picks the response used when no handler answers the operation.
    ///
    /// Keys are scanned in sorted order; the first key starting with `2`
    /// wins with its parsed status code. Otherwise `default` is reported as
    /// `200 OK`. Returns `None` when neither exists.
    #[must_use]
    pub fn fallback_response(&self) -> Option<(StatusCode, &ResponseSpec)> {
        if let Some((key, spec)) = self.responses.iter().find(|(key, _)| key.starts_with('2')) {
            let status = key
                .parse::<u16>()
                .ok()
                .and_then(|code| StatusCode::from_u16(code).ok())
                .unwrap_or(StatusCode::OK);
            return Some((status, spec));
        }
        self.responses
            .get("default")
            .map(|spec| (StatusCode::OK, spec))
    }

    /// Attempts to match a path (relative to the base path) against this
    /// operation's template.
    ///
    /// Returns the extracted path variables if the path matches.
    #[must_use]
    pub fn match_path(&self, request_path: &str) -> Option<PathParams> {
        let request_segments: Vec<&str> = request_path
            .trim_start_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        if request_segments.len() != self.path_segments.len() {
            return None;
        }

        let mut params = PathParams::new();

        for (pattern, actual) in self.path_segments.iter().zip(request_segments.iter()) {
            match pattern {
                PathSegment::Literal(lit) => {
                    if lit != actual {
                        return None;
                    }
                }
                PathSegment::Parameter(name) => {
                    params.insert(name.clone(), percent_decode(actual));
                }
            }
        }

        Some(params)
    }

    fn variable_segments(&self) -> usize {
        self.path_segments
            .iter()
            .filter(|segment| matches!(segment, PathSegment::Parameter(_)))
            .count()
    }

    fn parse_path(path: &str) -> Vec<PathSegment> {
        path.trim_start_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|segment| {
                if segment.starts_with('{') && segment.ends_with('}') {
                    PathSegment::Parameter(segment[1..segment.len() - 1].to_string())
                } else {
                    PathSegment::Literal(segment.to_string())
                }
            })
            .collect()
    }
}

/// Decodes `%XX` escapes in a path segment. Invalid escapes are kept as-is.
fn percent_decode(segment: &str) -> String {
    if !segment.contains('%') {
        return segment.to_string();
    }
    let bytes = segment.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push(hi << 4 | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

const fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Builder for creating [`Operation`] instances.
#[derive(Debug)]
pub struct OperationBuilder {
    operation_id: Option<String>,
    method: Method,
    path: String,
    parameters: Vec<Parameter>,
    responses: BTreeMap<String, ResponseSpec>,
    tags: Vec<String>,
    summary: Option<String>,
    description: Option<String>,
    consumes: Vec<String>,
    produces: Vec<String>,
    extensions: BTreeMap<String, Value>,
}

impl OperationBuilder {
    /// Creates a new operation builder.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            operation_id: None,
            method,
            path: path.into(),
            parameters: Vec::new(),
            responses: BTreeMap::new(),
            tags: Vec::new(),
            summary: None,
            description: None,
            consumes: Vec::new(),
            produces: Vec::new(),
            extensions: BTreeMap::new(),
        }
    }

    /// Sets the `operationId`.
    #[must_use]
    pub fn operation_id(mut self, operation_id: impl Into<String>) -> Self {
        self.operation_id = Some(operation_id.into());
        self
    }

    /// Appends a parameter.
    #[must_use]
    pub fn parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Appends several parameters.
    #[must_use]
    pub fn parameters(mut self, parameters: impl IntoIterator<Item = Parameter>) -> Self {
        self.parameters.extend(parameters);
        self
    }

    /// Declares a response for a status key (`"200"`, `"404"`, `"default"`).
    #[must_use]
    pub fn response(mut self, key: impl Into<String>, response: ResponseSpec) -> Self {
        self.responses.insert(key.into(), response);
        self
    }

    /// Adds a tag.
    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Sets the summary.
    #[must_use]
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds an accepted media type.
    #[must_use]
    pub fn consumes(mut self, media_type: impl Into<String>) -> Self {
        self.consumes.push(media_type.into());
        self
    }

    /// Adds a produced media type.
    #[must_use]
    pub fn produces(mut self, media_type: impl Into<String>) -> Self {
        self.produces.push(media_type.into());
        self
    }

    /// Sets a vendor extension.
    #[must_use]
    pub fn extension(mut self, name: impl Into<String>, value: Value) -> Self {
        self.extensions.insert(name.into(), value);
        self
    }

    /// Builds the operation.
    #[must_use]
    pub fn build(self) -> Operation {
        let path_segments = Operation::parse_path(&self.path);
        Operation {
            operation_id: self.operation_id,
            method: self.method,
            path: self.path,
            path_segments,
            parameters: self.parameters,
            responses: self.responses,
            tags: self.tags,
            summary: self.summary,
            description: self.description,
            consumes: self.consumes,
            produces: self.produces,
            extensions: self.extensions,
        }
    }
}

/// A path segment in an operation's path template.
#[derive(Debug, Clone)]
enum PathSegment {
    /// A literal path segment (e.g., "pets").
    Literal(String),
    /// A path variable (e.g., "{petId}").
    Parameter(String),
}
