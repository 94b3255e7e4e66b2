//! Handler registration and binding.
//!
//! Applications register handler factories in a [`HandlerRegistry`] under a
//! [`HandlerKey`]: either the operation's route or a canonical
//! `controller::method` name (see [`naming`](crate::naming)). At startup the
//! [`Binder`] resolves each contract operation to at most one handler,
//! instantiates it once and checks its declared [`Signature`] against the
//! operation's parameters. Operations left without a binding are answered
//! with mock responses.
//!
//! # Example
//!
//! ```rust
//! use http::Method;
//! use inflector_core::{ArgKind, HandlerOutput, Signature};
//! use inflector_server::{HandlerKey, HandlerRegistry};
//! use serde_json::json;
//!
//! let mut registry = HandlerRegistry::new();
//! registry.register_fn(
//!     HandlerKey::named("io.swagger.sample.controllers.Pet", "getPetById"),
//!     Signature::new([ArgKind::Long]),
//!     |_ctx, args| Ok(HandlerOutput::Value(json!({ "id": args.i64("petId") }))),
//! );
//! registry.register_fn(
//!     HandlerKey::route(Method::GET, "/store/inventory"),
//!     Signature::any(0),
//!     |_ctx, _args| Ok(HandlerOutput::Empty),
//! );
//!
//! assert_eq!(registry.len(), 2);
//! ```

use crate::config::DispatchConfig;
use crate::naming;
use http::Method;
use indexmap::IndexMap;
use inflector_core::{
    Arguments, FnHandler, HandlerResult, InflectorError, InflectorResult, ModelNaming, Operation,
    OperationHandler, RequestContext, Signature,
};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Creates a handler instance. Invoked at most once per bound operation.
pub type HandlerFactory = Box<dyn Fn() -> Arc<dyn OperationHandler> + Send + Sync>;

/// Key a handler is registered under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HandlerKey {
    /// Method plus path template as declared, without the base path.
    Route {
        /// HTTP method.
        method: Method,
        /// Path template, e.g. `/pet/{petId}`.
        path: String,
    },
    /// Qualified controller plus method name.
    Named {
        /// Controller, e.g. `io.swagger.sample.controllers.Pet`.
        controller: String,
        /// Method, e.g. `getPetById`.
        method: String,
    },
}

impl HandlerKey {
    /// Creates a route key.
    #[must_use]
    pub fn route(method: Method, path: impl Into<String>) -> Self {
        Self::Route {
            method,
            path: path.into(),
        }
    }

    /// Creates a named key.
    #[must_use]
    pub fn named(controller: impl Into<String>, method: impl Into<String>) -> Self {
        Self::Named {
            controller: controller.into(),
            method: method.into(),
        }
    }
}

impl fmt::Display for HandlerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Route { method, path } => write!(f, "{method} {path}"),
            Self::Named { controller, method } => write!(f, "{controller}::{method}"),
        }
    }
}

/// Explicit handler registration table.
///
/// Entries keep registration order, which is also the order unused
/// registrations are reported in.
#[derive(Default)]
pub struct HandlerRegistry {
    factories: IndexMap<HandlerKey, HandlerFactory>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: IndexMap::new(),
        }
    }

    /// Registers a handler factory.
    ///
    /// A later registration under the same key replaces the earlier one.
    pub fn register<H, F>(&mut self, key: HandlerKey, factory: F)
    where
        H: OperationHandler,
        F: Fn() -> H + Send + Sync + 'static,
    {
        let erased: HandlerFactory =
            Box::new(move || Arc::new(factory()) as Arc<dyn OperationHandler>);
        if self.factories.insert(key.clone(), erased).is_some() {
            tracing::warn!(handler = %key, "Handler registration replaced");
        }
    }

    /// Registers a closure with an explicit signature.
    pub fn register_fn<F>(&mut self, key: HandlerKey, signature: Signature, func: F)
    where
        F: Fn(&RequestContext, &Arguments) -> HandlerResult + Send + Sync + 'static,
    {
        let func = Arc::new(func);
        self.register(key, move || {
            let func = Arc::clone(&func);
            FnHandler::new(
                signature.clone(),
                move |ctx: &RequestContext, args: &Arguments| func(ctx, args),
            )
        });
    }

    /// Registers a shared handler instance for a route.
    pub fn route<H>(&mut self, method: Method, path: impl Into<String>, handler: H)
    where
        H: OperationHandler,
    {
        let shared: Arc<dyn OperationHandler> = Arc::new(handler);
        let erased: HandlerFactory = Box::new(move || Arc::clone(&shared));
        let key = HandlerKey::route(method, path);
        if self.factories.insert(key.clone(), erased).is_some() {
            tracing::warn!(handler = %key, "Handler registration replaced");
        }
    }

    /// Returns `true` if a handler is registered under the key.
    #[must_use]
    pub fn contains(&self, key: &HandlerKey) -> bool {
        self.factories.contains_key(key)
    }

    /// Returns the number of registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Returns the registered keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &HandlerKey> {
        self.factories.keys()
    }

    fn factory(&self, key: &HandlerKey) -> Option<&HandlerFactory> {
        self.factories.get(key)
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("keys", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A handler bound to one operation.
#[derive(Clone)]
pub struct HandlerBinding {
    key: HandlerKey,
    handler: Arc<dyn OperationHandler>,
    signature: Signature,
}

impl HandlerBinding {
    /// Returns the key the handler was found under.
    #[must_use]
    pub fn key(&self) -> &HandlerKey {
        &self.key
    }

    /// Returns the handler instance.
    #[must_use]
    pub fn handler(&self) -> &Arc<dyn OperationHandler> {
        &self.handler
    }

    /// Returns the handler's declared signature.
    #[must_use]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }
}

impl fmt::Debug for HandlerBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerBinding")
            .field("key", &self.key)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Resolves operations to registered handlers.
#[derive(Debug)]
pub struct Binder<'a> {
    registry: &'a HandlerRegistry,
    config: &'a DispatchConfig,
    naming: ModelNaming,
    used: HashSet<HandlerKey>,
}

impl<'a> Binder<'a> {
    /// Creates a binder over a registry.
    #[must_use]
    pub fn new(registry: &'a HandlerRegistry, config: &'a DispatchConfig) -> Self {
        Self {
            registry,
            config,
            naming: config.model_naming(),
            used: HashSet::new(),
        }
    }

    /// Returns the keys tried for an operation, in lookup order.
    #[must_use]
    pub fn candidate_keys(&self, operation: &Operation) -> Vec<HandlerKey> {
        let method = naming::method_name(operation);
        let mut keys = vec![HandlerKey::route(
            operation.method().clone(),
            operation.path(),
        )];
        keys.extend(
            naming::controller_candidates(operation, self.config.controller_package())
                .into_iter()
                .map(|controller| HandlerKey::named(controller, method.clone())),
        );
        keys
    }

    /// Binds one operation.
    ///
    /// Returns `Ok(None)` when no handler is registered for the operation or
    /// when the registered handler's signature does not fit and signatures
    /// are not strict.
    ///
    /// # Errors
    ///
    /// Returns [`InflectorError::Binding`] on a signature mismatch when
    /// strict signatures are configured.
    pub fn bind(&mut self, operation: &Operation) -> InflectorResult<Option<HandlerBinding>> {
        let registry = self.registry;
        let expected = Signature::for_parameters(operation.parameters(), &self.naming);

        let found = self
            .candidate_keys(operation)
            .into_iter()
            .find_map(|key| registry.factory(&key).map(|factory| (key, factory)));

        let Some((key, factory)) = found else {
            let canonical = HandlerKey::named(
                naming::controller_name(operation, self.config.controller_package()),
                naming::method_name(operation),
            );
            tracing::debug!(
                operation = %operation.key(),
                handler = %canonical,
                signature = %expected,
                "No handler registered, operation will be mocked"
            );
            return Ok(None);
        };

        self.used.insert(key.clone());
        let handler = factory();
        let declared = handler.signature();

        if let Err(mismatch) = declared.check(&expected) {
            tracing::warn!(
                operation = %operation.key(),
                handler = %key,
                declared = %declared,
                expected = %expected,
                "Handler signature does not match operation: {mismatch}"
            );
            if self.config.strict_signatures() {
                return Err(InflectorError::binding(
                    operation.key(),
                    format!("{key}: {mismatch}"),
                ));
            }
            return Ok(None);
        }

        tracing::debug!(operation = %operation.key(), handler = %key, "Handler bound");
        Ok(Some(HandlerBinding {
            key,
            handler,
            signature: declared,
        }))
    }

    /// Reports registrations that no operation used and returns their keys.
    pub fn finish(self) -> Vec<HandlerKey> {
        let unused: Vec<HandlerKey> = self
            .registry
            .keys()
            .filter(|key| !self.used.contains(*key))
            .cloned()
            .collect();
        for key in &unused {
            tracing::warn!(handler = %key, "Registered handler matches no operation");
        }
        unused
    }
}
