//! Per-operation request dispatch.
//!
//! An [`OperationDispatcher`] owns one contract operation and its optional
//! handler binding. For every request it:
//!
//! 1. Builds the [`RequestContext`] (request id, headers, operation key).
//! 2. Extracts and coerces every declared parameter.
//! 3. Rejects the request if a required parameter has no value.
//! 4. Invokes the bound handler, or synthesizes a mock response.
//! 5. Negotiates the response content type.
//!
//! Dispatch is synchronous and never fails: every outcome, including handler
//! failures, becomes a [`ResponseContext`].

use crate::binder::HandlerBinding;
use crate::serialize::negotiate;
use http::StatusCode;
use inflector_core::example::ExampleSynthesizer;
use inflector_core::{
    essence, missing_parameters_message, Arguments, HandlerError, HandlerOutput, InflectorError,
    ModelRegistry, Operation, RequestContext, RequestId, ResponseContext, ResponseSpec,
};
use inflector_extract::{missing_required, ExtractionContext, ParameterExtractor};
use serde_json::Value;
use std::sync::Arc;

/// Request header carrying the request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const ANY: &str = "*/*";

/// Dispatches requests for one operation.
#[derive(Debug, Clone)]
pub struct OperationDispatcher {
    operation: Operation,
    models: Arc<ModelRegistry>,
    binding: Option<HandlerBinding>,
    invalid_request_status: StatusCode,
}

impl OperationDispatcher {
    /// Creates a dispatcher.
    #[must_use]
    pub fn new(
        operation: Operation,
        models: Arc<ModelRegistry>,
        binding: Option<HandlerBinding>,
        invalid_request_status: StatusCode,
    ) -> Self {
        Self {
            operation,
            models,
            binding,
            invalid_request_status,
        }
    }

    /// Returns the operation.
    #[must_use]
    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    /// Returns the handler binding, if any.
    #[must_use]
    pub fn binding(&self) -> Option<&HandlerBinding> {
        self.binding.as_ref()
    }

    /// Returns `true` if a handler answers this operation.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    /// Handles one request.
    ///
    /// `ctx` must already carry the path variables of the matched template.
    #[must_use]
    pub fn dispatch(&self, ctx: &ExtractionContext) -> ResponseContext {
        let request = self.request_context(ctx);

        let arguments = ParameterExtractor::new(ctx).extract_all(self.operation.parameters());
        let missing = missing_required(self.operation.parameters(), &arguments);
        if !missing.is_empty() {
            let message = missing_parameters_message(&missing);
            tracing::debug!(
                request_id = %request.request_id(),
                operation = %self.operation.key(),
                "{message}"
            );
            let response = ResponseContext::error(self.invalid_request_status, message);
            return self.negotiate_content_type(response, &request);
        }

        let response = match &self.binding {
            Some(binding) => self.invoke(binding, &request, &arguments),
            None => self.mock(&request),
        };
        self.negotiate_content_type(response, &request)
    }

    fn request_context(&self, ctx: &ExtractionContext) -> RequestContext {
        let request_id = ctx
            .header(REQUEST_ID_HEADER)
            .and_then(RequestId::parse)
            .unwrap_or_default();
        RequestContext::new(ctx.method().clone(), ctx.path())
            .with_headers(ctx.headers().clone())
            .with_request_id(request_id)
            .with_operation(self.operation.key())
    }

    fn invoke(
        &self,
        binding: &HandlerBinding,
        request: &RequestContext,
        arguments: &Arguments,
    ) -> ResponseContext {
        match binding.handler().handle(request, arguments) {
            Ok(HandlerOutput::Envelope(envelope)) => envelope,
            Ok(HandlerOutput::Value(entity)) => ResponseContext::ok().with_entity(entity),
            Ok(HandlerOutput::Empty) => ResponseContext::ok(),
            Err(HandlerError::Api { status, message }) => ResponseContext::error(status, message),
            Err(HandlerError::Failed(message)) => {
                let error = InflectorError::handler_invocation(self.operation.key(), message);
                tracing::error!(
                    request_id = %request.request_id(),
                    handler = %binding.key(),
                    error = %error,
                    "Handler failed"
                );
                ResponseContext::error(error.status_code(), error.client_message())
            }
        }
    }

    fn mock(&self, request: &RequestContext) -> ResponseContext {
        let Some((status, spec)) = self.operation.fallback_response() else {
            return ResponseContext::ok();
        };
        let response = ResponseContext::new(status);

        if let Some((media_type, example)) =
            declared_example(spec, request.accept(), self.operation.produces())
        {
            return response
                .with_content_type(media_type)
                .with_entity(example.clone());
        }

        let synthesized = spec
            .schema
            .as_ref()
            .and_then(|schema| ExampleSynthesizer::new(&self.models).synthesize(schema));
        match synthesized {
            Some(entity) => response.with_entity(entity),
            None => response,
        }
    }

    fn negotiate_content_type(
        &self,
        response: ResponseContext,
        request: &RequestContext,
    ) -> ResponseContext {
        if response.content_type().is_some() {
            return response;
        }
        match negotiate(request.accept(), self.operation.produces()) {
            Some(media_type) => response.with_content_type(media_type),
            None => response,
        }
    }
}

/// Finds an author-declared example for the negotiated media type.
///
/// Accepted types are tried in preference order; `*/*` takes the first
/// example. Without an accept list the produced types are tried, then the
/// first example.
fn declared_example<'s>(
    spec: &'s ResponseSpec,
    accept: &[String],
    produces: &[String],
) -> Option<(&'s str, &'s Value)> {
    let first = || {
        spec.examples
            .iter()
            .next()
            .map(|(media_type, example)| (media_type.as_str(), example))
    };
    let lookup = |wanted: &str| {
        spec.examples
            .iter()
            .find(|(media_type, _)| essence(media_type) == wanted)
            .map(|(media_type, example)| (media_type.as_str(), example))
    };

    if accept.is_empty() {
        return produces
            .iter()
            .find_map(|media_type| lookup(&essence(media_type)))
            .or_else(first);
    }
    accept.iter().find_map(|wanted| {
        if wanted == ANY {
            first()
        } else {
            lookup(wanted)
        }
    })
}
