//! The operation table.
//!
//! [`Inflector`] is built once from a [`Contract`] and a
//! [`HandlerRegistry`]: every operation is bound (or left to the mock path)
//! and gets its own [`OperationDispatcher`]. Afterwards the table is
//! immutable and shared by all requests.

use crate::binder::{Binder, HandlerRegistry};
use crate::config::DispatchConfig;
use crate::dispatcher::OperationDispatcher;
use crate::serialize::{SerializationConfig, APPLICATION_JSON, APPLICATION_YAML};
use http::Method;
use inflector_core::{Contract, InflectorError, InflectorResult, ResponseContext};
use inflector_extract::ExtractionContext;
use std::collections::HashMap;
use std::sync::Arc;

/// File name the JSON rendering of the contract is served under.
pub const SWAGGER_JSON: &str = "swagger.json";

/// File name the YAML rendering of the contract is served under.
pub const SWAGGER_YAML: &str = "swagger.yaml";

/// Routes requests to per-operation dispatchers.
///
/// # Example
///
/// ```rust
/// use inflector_core::fixtures::PETSTORE_YAML;
/// use inflector_core::Contract;
/// use inflector_extract::ExtractionContext;
/// use inflector_server::{DispatchConfig, HandlerRegistry, Inflector};
/// use std::sync::Arc;
///
/// let contract = Arc::new(Contract::from_yaml_str(PETSTORE_YAML).unwrap());
/// let inflector = Inflector::new(contract, &HandlerRegistry::new(), &DispatchConfig::default()).unwrap();
///
/// let response = inflector.handle(ExtractionContext::builder().uri("/v2/store/inventory").build());
/// assert_eq!(response.status(), 200);
/// assert_eq!(response.entity(), Some(&serde_json::json!({ "key": 0 })));
/// ```
#[derive(Debug)]
pub struct Inflector {
    contract: Arc<Contract>,
    dispatchers: HashMap<String, OperationDispatcher>,
    serialization: SerializationConfig,
}

impl Inflector {
    /// Binds every operation of a contract.
    ///
    /// # Errors
    ///
    /// Returns [`InflectorError::Binding`] when strict signatures are
    /// configured and a registered handler does not fit its operation.
    pub fn new(
        contract: Arc<Contract>,
        registry: &HandlerRegistry,
        config: &DispatchConfig,
    ) -> InflectorResult<Self> {
        let mut binder = Binder::new(registry, config);
        let mut dispatchers = HashMap::with_capacity(contract.operations().len());

        for operation in contract.operations() {
            let binding = binder.bind(operation)?;
            dispatchers.insert(
                operation.key(),
                OperationDispatcher::new(
                    operation.clone(),
                    Arc::clone(contract.models()),
                    binding,
                    config.invalid_request_status(),
                ),
            );
        }
        let unused = binder.finish();

        let bound = dispatchers.values().filter(|d| d.is_bound()).count();
        tracing::info!(
            title = %contract.title(),
            version = %contract.version(),
            operations = dispatchers.len(),
            bound,
            mocked = dispatchers.len() - bound,
            unused_handlers = unused.len(),
            "Operation table built"
        );

        Ok(Self {
            contract,
            dispatchers,
            serialization: SerializationConfig::new().pretty(config.pretty_print()),
        })
    }

    /// Returns the contract.
    #[must_use]
    pub fn contract(&self) -> &Arc<Contract> {
        &self.contract
    }

    /// Returns the serialization settings responses are rendered with.
    #[must_use]
    pub fn serialization(&self) -> SerializationConfig {
        self.serialization
    }

    /// Returns the dispatcher of an operation by method and path template.
    #[must_use]
    pub fn dispatcher(&self, method: &Method, path: &str) -> Option<&OperationDispatcher> {
        self.dispatchers
            .get(&inflector_core::operation_key(method, path))
    }

    /// Returns the number of operations answered by a handler.
    #[must_use]
    pub fn bound_operations(&self) -> usize {
        self.dispatchers.values().filter(|d| d.is_bound()).count()
    }

    /// Handles one request.
    ///
    /// Serves the contract document, dispatches to the matching operation,
    /// or answers `404`/`405` with an `ApiError` body.
    #[must_use]
    pub fn handle(&self, ctx: ExtractionContext) -> ResponseContext {
        if matches!(*ctx.method(), Method::GET | Method::HEAD) {
            if let Some(response) = self.document_response(ctx.path()) {
                return response;
            }
        }

        if let Some((operation, params)) = self.contract.match_operation(ctx.method(), ctx.path()) {
            return match self.dispatchers.get(&operation.key()) {
                Some(dispatcher) => dispatcher.dispatch(&ctx.with_path_params(params)),
                None => {
                    let error = InflectorError::internal(format!(
                        "no dispatcher for {}",
                        operation.key()
                    ));
                    tracing::error!(error = %error, "Operation table out of sync");
                    ResponseContext::error(error.status_code(), error.client_message())
                }
            };
        }

        let allowed = self.contract.allowed_methods(ctx.path());
        if !allowed.is_empty() {
            let allow = allowed
                .iter()
                .map(Method::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            let error = InflectorError::method_not_allowed(
                format!("Method {} not allowed for {}", ctx.method(), ctx.path()),
                allowed,
            );
            return ResponseContext::error(error.status_code(), error.client_message())
                .with_header(http::header::ALLOW.as_str(), allow);
        }

        let error = InflectorError::not_found(format!("No operation matches {}", ctx.path()));
        ResponseContext::error(error.status_code(), error.client_message())
    }

    fn document_response(&self, path: &str) -> Option<ResponseContext> {
        let file = self.contract.strip_base_path(path)?.strip_prefix('/')?;
        let content_type = match file {
            SWAGGER_JSON => APPLICATION_JSON,
            SWAGGER_YAML => APPLICATION_YAML,
            _ => return None,
        };
        Some(
            ResponseContext::ok()
                .with_content_type(content_type)
                .with_entity(self.contract.document().clone()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::HandlerKey;
    use http::StatusCode;
    use inflector_core::fixtures::PETSTORE_YAML;
    use inflector_core::{ArgKind, HandlerOutput, Signature};
    use serde_json::json;

    fn petstore(registry: &HandlerRegistry) -> Inflector {
        let contract = Arc::new(Contract::from_yaml_str(PETSTORE_YAML).expect("fixture loads"));
        Inflector::new(contract, registry, &DispatchConfig::default()).expect("table builds")
    }

    // ==================== Routing Tests ====================

    #[test]
    fn test_not_found() {
        let inflector = petstore(&HandlerRegistry::new());
        let response = inflector.handle(ExtractionContext::builder().uri("/v2/unknown").build());

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.entity().and_then(|e| e["code"].as_u64()), Some(404));
    }

    #[test]
    fn test_outside_base_path_is_not_found() {
        let inflector = petstore(&HandlerRegistry::new());
        let response = inflector.handle(ExtractionContext::builder().uri("/pet/1").build());
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_method_not_allowed_lists_methods() {
        let inflector = petstore(&HandlerRegistry::new());
        let response = inflector.handle(
            ExtractionContext::builder()
                .method(Method::PUT)
                .uri("/v2/pet/1")
                .build(),
        );

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let allow: Vec<&str> = response.header_values("allow").collect();
        assert_eq!(allow, vec!["GET, POST, DELETE"]);
    }

    #[test]
    fn test_literal_route_before_template() {
        let inflector = petstore(&HandlerRegistry::new());
        let response = inflector.handle(
            ExtractionContext::builder()
                .uri("/v2/pet/findByStatus?status=sold")
                .build(),
        );

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.entity().is_some_and(serde_json::Value::is_array));
    }

    #[test]
    fn test_head_falls_back_to_get() {
        let inflector = petstore(&HandlerRegistry::new());
        let response = inflector.handle(
            ExtractionContext::builder()
                .method(Method::HEAD)
                .uri("/v2/store/inventory")
                .build(),
        );
        assert_eq!(response.status(), StatusCode::OK);
    }

    // ==================== Document Tests ====================

    #[test]
    fn test_document_routes() {
        let inflector = petstore(&HandlerRegistry::new());

        let json_doc = inflector.handle(ExtractionContext::builder().uri("/v2/swagger.json").build());
        assert_eq!(json_doc.status(), StatusCode::OK);
        assert_eq!(json_doc.content_type(), Some(APPLICATION_JSON));
        assert_eq!(
            json_doc.entity().and_then(|d| d["info"]["title"].as_str()),
            Some("Swagger Petstore")
        );

        let yaml_doc = inflector.handle(ExtractionContext::builder().uri("/v2/swagger.yaml").build());
        assert_eq!(yaml_doc.content_type(), Some(APPLICATION_YAML));
        assert_eq!(yaml_doc.entity(), json_doc.entity());
    }

    #[test]
    fn test_document_only_for_get() {
        let inflector = petstore(&HandlerRegistry::new());
        let response = inflector.handle(
            ExtractionContext::builder()
                .method(Method::POST)
                .uri("/v2/swagger.json")
                .build(),
        );
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    // ==================== Binding Tests ====================

    #[test]
    fn test_bound_and_mocked_operations() {
        let mut registry = HandlerRegistry::new();
        registry.register_fn(
            HandlerKey::named("io.swagger.sample.controllers.Pet", "getPetById"),
            Signature::new([ArgKind::Long]),
            |_ctx, args| Ok(HandlerOutput::Value(json!({ "id": args.i64("petId"), "name": "Rex" }))),
        );
        let inflector = petstore(&registry);
        assert_eq!(inflector.bound_operations(), 1);
        assert!(inflector
            .dispatcher(&Method::GET, "/pet/{petId}")
            .is_some_and(OperationDispatcher::is_bound));

        let response = inflector.handle(ExtractionContext::builder().uri("/v2/pet/5").build());
        assert_eq!(response.entity(), Some(&json!({ "id": 5, "name": "Rex" })));
    }

    #[test]
    fn test_strict_mismatch_fails_build() {
        let mut registry = HandlerRegistry::new();
        registry.register_fn(
            HandlerKey::route(Method::GET, "/pet/{petId}"),
            Signature::new([ArgKind::Uuid]),
            |_ctx, _args| Ok(HandlerOutput::Empty),
        );
        let contract = Arc::new(Contract::from_yaml_str(PETSTORE_YAML).expect("fixture loads"));
        let config = DispatchConfig::builder().strict_signatures(true).build();

        let result = Inflector::new(contract, &registry, &config);
        assert!(matches!(result, Err(InflectorError::Binding { .. })));
    }
}
