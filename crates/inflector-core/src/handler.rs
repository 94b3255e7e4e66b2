//! Handler trait for operation processing.
//!
//! An [`OperationHandler`] implements one contract operation. It receives the
//! [`RequestContext`] plus one typed argument per declared parameter and
//! declares its argument types through a [`Signature`], which the binder
//! checks against the operation before the handler is used.
//!
//! Handlers run synchronously on a blocking thread and may be called
//! concurrently; any interior mutability is the handler's responsibility.

use crate::contract::{Parameter, ParameterType, PrimitiveType};
use crate::response::ResponseContext;
use crate::schema::Schema;
use crate::value::Arguments;
use crate::RequestContext;
use http::StatusCode;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Declared type of one handler argument slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArgKind {
    /// The request context (always slot 0).
    Context,
    /// Text.
    String,
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
    /// UUID.
    Uuid,
    /// Array with the given item kind.
    List(Box<ArgKind>),
    /// Named model type.
    Model(String),
    /// Untyped JSON body.
    Json,
    /// Raw uploaded content.
    File,
    /// Accepts any argument.
    Any,
}

impl ArgKind {
    /// Creates a model argument kind.
    #[must_use]
    pub fn model(type_name: impl Into<String>) -> Self {
        Self::Model(type_name.into())
    }

    /// Creates a list argument kind.
    #[must_use]
    pub fn list(items: ArgKind) -> Self {
        Self::List(Box::new(items))
    }

    /// Returns `true` if a slot declared as `self` can receive `expected`.
    ///
    /// `Any` accepts everything and `Json` accepts any model.
    #[must_use]
    pub fn accepts(&self, expected: &ArgKind) -> bool {
        match (self, expected) {
            (Self::Any, _) | (Self::Json, Self::Model(_)) => true,
            (Self::List(declared), Self::List(items)) => declared.accepts(items),
            (declared, expected) => declared == expected,
        }
    }

    /// Returns the kind a scalar type is coerced into.
    #[must_use]
    pub const fn for_primitive(primitive: PrimitiveType) -> Self {
        match primitive {
            PrimitiveType::Uuid => Self::Uuid,
            PrimitiveType::Integer => Self::Integer,
            PrimitiveType::Long => Self::Long,
            PrimitiveType::Float => Self::Float,
            PrimitiveType::Double => Self::Double,
            PrimitiveType::Boolean => Self::Boolean,
            PrimitiveType::String
            | PrimitiveType::Email
            | PrimitiveType::Date
            | PrimitiveType::DateTime
            | PrimitiveType::Password
            | PrimitiveType::Byte
            | PrimitiveType::Binary => Self::String,
        }
    }

    /// Returns the kind a parameter is delivered as.
    #[must_use]
    pub fn for_parameter(parameter: &Parameter, naming: &ModelNaming) -> Self {
        match parameter.param_type() {
            ParameterType::Primitive { primitive } => Self::for_primitive(*primitive),
            ParameterType::Array { items, .. } => Self::list(Self::for_primitive(*items)),
            ParameterType::File => Self::File,
            ParameterType::Body { schema } => Self::for_body(schema, naming),
        }
    }

    fn for_body(schema: &Schema, naming: &ModelNaming) -> Self {
        match schema {
            Schema::Ref { name } => Self::Model(naming.type_name(name)),
            Schema::Array { items, .. } => Self::list(Self::for_body(items, naming)),
            _ => Self::Json,
        }
    }
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Context => f.write_str("RequestContext"),
            Self::String => f.write_str("String"),
            Self::Integer => f.write_str("i32"),
            Self::Long => f.write_str("i64"),
            Self::Float => f.write_str("f32"),
            Self::Double => f.write_str("f64"),
            Self::Boolean => f.write_str("bool"),
            Self::Uuid => f.write_str("Uuid"),
            Self::List(items) => write!(f, "Vec<{items}>"),
            Self::Model(name) => f.write_str(name),
            Self::Json => f.write_str("Value"),
            Self::File => f.write_str("Bytes"),
            Self::Any => f.write_str("_"),
        }
    }
}

/// Maps contract model names to handler-facing type names.
///
/// Explicit mappings win; otherwise the name is qualified with the model
/// package (`io.swagger.sample.models.Pet`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelNaming {
    package: String,
    mappings: HashMap<String, String>,
}

impl ModelNaming {
    /// Creates a naming convention.
    #[must_use]
    pub fn new(package: impl Into<String>, mappings: HashMap<String, String>) -> Self {
        Self {
            package: package.into(),
            mappings,
        }
    }

    /// Returns the type name for a model.
    #[must_use]
    pub fn type_name(&self, model: &str) -> String {
        if let Some(mapped) = self.mappings.get(model) {
            return mapped.clone();
        }
        if self.package.is_empty() {
            model.to_string()
        } else {
            format!("{}.{}", self.package, model)
        }
    }
}

/// Ordered argument kinds of a handler; slot 0 is the request context.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    slots: Vec<ArgKind>,
}

impl Signature {
    /// Creates a signature from the kinds following the context slot.
    #[must_use]
    pub fn new(arguments: impl IntoIterator<Item = ArgKind>) -> Self {
        let mut slots = vec![ArgKind::Context];
        slots.extend(arguments);
        Self { slots }
    }

    /// Creates a signature from raw slots, context slot included.
    ///
    /// Used when the first slot must be checked rather than assumed.
    #[must_use]
    pub fn from_slots(slots: Vec<ArgKind>) -> Self {
        Self { slots }
    }

    /// Creates the signature an operation expects.
    #[must_use]
    pub fn for_parameters(parameters: &[Parameter], naming: &ModelNaming) -> Self {
        Self::new(parameters.iter().map(|p| ArgKind::for_parameter(p, naming)))
    }

    /// Creates a signature that accepts `count` arguments of any kind.
    #[must_use]
    pub fn any(count: usize) -> Self {
        Self::new(std::iter::repeat(ArgKind::Any).take(count))
    }

    /// Returns all slots, context included.
    #[must_use]
    pub fn slots(&self) -> &[ArgKind] {
        &self.slots
    }

    /// Returns the number of slots, context included.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.slots.len()
    }

    /// Checks this declared signature against the expected one.
    pub fn check(&self, expected: &Signature) -> Result<(), SignatureMismatch> {
        if self.arity() != expected.arity() {
            return Err(SignatureMismatch::Arity {
                declared: self.arity(),
                expected: expected.arity(),
            });
        }
        for (slot, (declared, wanted)) in self.slots.iter().zip(&expected.slots).enumerate() {
            if !declared.accepts(wanted) {
                return Err(SignatureMismatch::Slot {
                    slot,
                    declared: declared.clone(),
                    expected: wanted.clone(),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, slot) in self.slots.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{slot}")?;
        }
        f.write_str(")")
    }
}

/// Why a declared signature does not fit an operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureMismatch {
    /// Wrong number of slots.
    #[error("expected {expected} arguments (context included), handler declares {declared}")]
    Arity {
        /// Slots the handler declares.
        declared: usize,
        /// Slots the operation needs.
        expected: usize,
    },
    /// A slot has an incompatible type.
    #[error("argument {slot} is declared as {declared} but the operation supplies {expected}")]
    Slot {
        /// Zero-based slot position (0 is the context).
        slot: usize,
        /// Declared kind.
        declared: ArgKind,
        /// Kind the operation supplies.
        expected: ArgKind,
    },
}

/// What a handler returns on success.
#[derive(Debug, Clone, PartialEq)]
pub enum HandlerOutput {
    /// Explicit status, headers, content type and body.
    Envelope(ResponseContext),
    /// A plain value, sent as `200 OK`.
    Value(Value),
    /// No body, `200 OK`.
    Empty,
}

impl HandlerOutput {
    /// Wraps any serializable value as a plain response body.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, HandlerError> {
        serde_json::to_value(value)
            .map(Self::Value)
            .map_err(|e| HandlerError::failed(format!("response serialization failed: {e}")))
    }
}

impl From<ResponseContext> for HandlerOutput {
    fn from(envelope: ResponseContext) -> Self {
        Self::Envelope(envelope)
    }
}

impl From<Value> for HandlerOutput {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// A handler failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandlerError {
    /// Deliberate error response chosen by the handler.
    #[error("{status}: {message}")]
    Api {
        /// Status to answer with.
        status: StatusCode,
        /// Message for the client.
        message: String,
    },
    /// The handler could not complete.
    #[error("{0}")]
    Failed(String),
}

impl HandlerError {
    /// Creates a deliberate error response.
    #[must_use]
    pub fn api(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Creates an invocation failure.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Result type returned by handlers.
pub type HandlerResult = Result<HandlerOutput, HandlerError>;

/// A synchronous handler for one contract operation.
///
/// # Example
///
/// ```
/// use inflector_core::handler::{ArgKind, HandlerOutput, HandlerResult, OperationHandler, Signature};
/// use inflector_core::value::Arguments;
/// use inflector_core::RequestContext;
/// use serde_json::json;
///
/// struct GetPetById;
///
/// impl OperationHandler for GetPetById {
///     fn signature(&self) -> Signature {
///         Signature::new([ArgKind::Long])
///     }
///
///     fn handle(&self, _ctx: &RequestContext, args: &Arguments) -> HandlerResult {
///         let id = args.i64("petId").unwrap_or_default();
///         Ok(HandlerOutput::Value(json!({ "id": id, "name": "doggie" })))
///     }
/// }
/// ```
pub trait OperationHandler: Send + Sync + 'static {
    /// Declared argument kinds, context slot included.
    fn signature(&self) -> Signature;

    /// Handles one request.
    fn handle(&self, ctx: &RequestContext, args: &Arguments) -> HandlerResult;
}

/// A function-based handler wrapper.
///
/// ```
/// use inflector_core::handler::{FnHandler, HandlerOutput, OperationHandler, Signature};
/// use inflector_core::value::Arguments;
/// use inflector_core::RequestContext;
///
/// let handler = FnHandler::new(Signature::any(0), |_ctx: &RequestContext, _args: &Arguments| {
///     Ok(HandlerOutput::Empty)
/// });
/// assert_eq!(handler.signature().arity(), 1);
/// ```
pub struct FnHandler<F>
where
    F: Fn(&RequestContext, &Arguments) -> HandlerResult + Send + Sync + 'static,
{
    signature: Signature,
    func: F,
}

impl<F> FnHandler<F>
where
    F: Fn(&RequestContext, &Arguments) -> HandlerResult + Send + Sync + 'static,
{
    /// Creates a new function-based handler.
    #[must_use]
    pub const fn new(signature: Signature, func: F) -> Self {
        Self { signature, func }
    }
}

impl<F> fmt::Debug for FnHandler<F>
where
    F: Fn(&RequestContext, &Arguments) -> HandlerResult + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

impl<F> OperationHandler for FnHandler<F>
where
    F: Fn(&RequestContext, &Arguments) -> HandlerResult + Send + Sync + 'static,
{
    fn signature(&self) -> Signature {
        self.signature.clone()
    }

    fn handle(&self, ctx: &RequestContext, args: &Arguments) -> HandlerResult {
        (self.func)(ctx, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{CollectionFormat, ParameterLocation};
    use serde_json::json;

    fn naming() -> ModelNaming {
        let mut mappings = HashMap::new();
        mappings.insert("Order".to_string(), "store.OrderDto".to_string());
        ModelNaming::new("io.swagger.sample.models", mappings)
    }

    // ==================== ArgKind Tests ====================

    #[test]
    fn test_kind_for_parameters() {
        let naming = naming();
        assert_eq!(
            ArgKind::for_parameter(&Parameter::path("petId", PrimitiveType::Long), &naming),
            ArgKind::Long
        );
        assert_eq!(
            ArgKind::for_parameter(&Parameter::query("email", PrimitiveType::Email), &naming),
            ArgKind::String
        );
        assert_eq!(
            ArgKind::for_parameter(
                &Parameter::array(
                    "ids",
                    ParameterLocation::Query,
                    PrimitiveType::Integer,
                    Some(CollectionFormat::Csv)
                ),
                &naming
            ),
            ArgKind::list(ArgKind::Integer)
        );
        assert_eq!(
            ArgKind::for_parameter(&Parameter::body("body", Schema::reference("Pet")), &naming),
            ArgKind::model("io.swagger.sample.models.Pet")
        );
        assert_eq!(
            ArgKind::for_parameter(&Parameter::body("body", Schema::reference("Order")), &naming),
            ArgKind::model("store.OrderDto")
        );
        assert_eq!(
            ArgKind::for_parameter(&Parameter::body("body", Schema::string()), &naming),
            ArgKind::Json
        );
        assert_eq!(
            ArgKind::for_parameter(&Parameter::file("upload"), &naming),
            ArgKind::File
        );
    }

    #[test]
    fn test_accepts() {
        assert!(ArgKind::Any.accepts(&ArgKind::Long));
        assert!(ArgKind::Json.accepts(&ArgKind::model("Pet")));
        assert!(ArgKind::list(ArgKind::Any).accepts(&ArgKind::list(ArgKind::Integer)));
        assert!(!ArgKind::Integer.accepts(&ArgKind::Long));
        assert!(!ArgKind::model("Pet").accepts(&ArgKind::model("Order")));
    }

    // ==================== Signature Tests ====================

    #[test]
    fn test_signature_check_ok() {
        let expected = Signature::new([ArgKind::Long, ArgKind::String]);
        assert!(Signature::new([ArgKind::Long, ArgKind::Any])
            .check(&expected)
            .is_ok());
        assert!(Signature::any(2).check(&expected).is_ok());
    }

    #[test]
    fn test_signature_arity_mismatch() {
        let expected = Signature::new([ArgKind::Long]);
        let err = Signature::any(2).check(&expected).expect_err("arity differs");
        assert_eq!(
            err,
            SignatureMismatch::Arity {
                declared: 3,
                expected: 2
            }
        );
    }

    #[test]
    fn test_signature_slot_mismatch() {
        let expected = Signature::new([ArgKind::Long, ArgKind::Boolean]);
        let err = Signature::new([ArgKind::Long, ArgKind::String])
            .check(&expected)
            .expect_err("slot differs");
        assert!(err.to_string().contains("argument 2"));
    }

    #[test]
    fn test_context_slot_is_checked() {
        let expected = Signature::new([ArgKind::Long]);
        let declared = Signature::from_slots(vec![ArgKind::Long, ArgKind::Long]);
        assert!(matches!(
            declared.check(&expected),
            Err(SignatureMismatch::Slot { slot: 0, .. })
        ));
    }

    #[test]
    fn test_signature_display() {
        let signature = Signature::new([ArgKind::Long, ArgKind::list(ArgKind::String)]);
        assert_eq!(signature.to_string(), "(RequestContext, i64, Vec<String>)");
    }

    // ==================== Handler Tests ====================

    #[test]
    fn test_fn_handler() {
        let handler = FnHandler::new(Signature::new([ArgKind::String]), |_ctx: &RequestContext, args: &Arguments| {
            let name = args.string("name").unwrap_or("world");
            Ok(HandlerOutput::Value(json!({ "greeting": format!("Hello, {name}!") })))
        });
        let args = Arguments::new(vec![(
            "name".to_string(),
            Some(crate::value::ParamValue::String("Rex".into())),
        )]);

        let output = handler
            .handle(&RequestContext::mock(), &args)
            .expect("handler succeeds");
        assert_eq!(
            output,
            HandlerOutput::Value(json!({ "greeting": "Hello, Rex!" }))
        );
    }

    #[test]
    fn test_handler_error_kinds() {
        let api = HandlerError::api(StatusCode::NOT_FOUND, "Pet not found");
        assert!(api.to_string().contains("Pet not found"));
        assert_eq!(HandlerError::failed("boom").to_string(), "boom");
    }

    #[test]
    fn test_output_from_serializable() {
        #[derive(Serialize)]
        struct Pet {
            id: i64,
        }
        let output = HandlerOutput::json(&Pet { id: 3 }).expect("serializes");
        assert_eq!(output, HandlerOutput::Value(json!({ "id": 3 })));
    }
}
