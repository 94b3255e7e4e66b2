//! # Inflector Server
//!
//! Binds the operations of a Swagger 2.0 contract to handlers and serves
//! them over HTTP.
//!
//! This crate provides:
//!
//! - [`HandlerRegistry`] and [`Binder`]: resolve each operation to a handler
//!   by route or by controller and method name, checking signatures
//! - [`OperationDispatcher`]: extract, validate, invoke or mock one operation
//! - [`Inflector`]: the immutable operation table, including `404`/`405`
//!   answers and the contract document routes
//! - [`Server`]: the Hyper front end with graceful shutdown
//!
//! ## Example
//!
//! ```rust
//! use inflector_core::fixtures::PETSTORE_YAML;
//! use inflector_core::{Contract, HandlerOutput, Signature};
//! use inflector_extract::ExtractionContext;
//! use inflector_server::{DispatchConfig, HandlerKey, HandlerRegistry, Inflector};
//! use std::sync::Arc;
//!
//! let mut registry = HandlerRegistry::new();
//! registry.register_fn(
//!     HandlerKey::named("io.swagger.sample.controllers.Store", "getInventory"),
//!     Signature::any(0),
//!     |_, _| Ok(HandlerOutput::Value(serde_json::json!({ "available": 3 }))),
//! );
//!
//! let contract = Arc::new(Contract::from_yaml_str(PETSTORE_YAML).unwrap());
//! let inflector = Inflector::new(contract, &registry, &DispatchConfig::default()).unwrap();
//! assert_eq!(inflector.bound_operations(), 1);
//!
//! let response = inflector.handle(ExtractionContext::builder().uri("/v2/store/inventory").build());
//! assert_eq!(response.entity(), Some(&serde_json::json!({ "available": 3 })));
//! ```

#![doc(html_root_url = "https://docs.rs/inflector-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod binder;
mod config;
mod dispatcher;
pub mod naming;
pub mod serialize;
mod server;
pub mod shutdown;
mod table;

pub use binder::{Binder, HandlerBinding, HandlerFactory, HandlerKey, HandlerRegistry};
pub use config::{
    DispatchConfig, DispatchConfigBuilder, ServerConfig, ServerConfigBuilder,
    DEFAULT_CONTROLLER_PACKAGE, DEFAULT_HTTP_ADDR, DEFAULT_MAX_BODY_SIZE, DEFAULT_MODEL_PACKAGE,
    DEFAULT_SHUTDOWN_TIMEOUT_SECS,
};
pub use dispatcher::{OperationDispatcher, REQUEST_ID_HEADER};
pub use serialize::{RenderedBody, SerializationConfig, SerializationError};
pub use server::{HttpResponse, ResponseBody, Server, ServerBuilder, ServerError};
pub use shutdown::{ConnectionTracker, ShutdownSignal};
pub use table::{Inflector, SWAGGER_JSON, SWAGGER_YAML};
