//! # Inflector Core
//!
//! Core types for the Inflector contract-driven dispatcher.
//!
//! This crate provides the foundational types used throughout Inflector:
//!
//! - [`Contract`] - A loaded Swagger 2.0 contract: operations, parameters and models
//! - [`ModelRegistry`](schema::ModelRegistry) - Named models shared by the contract
//! - [`RequestContext`] - Per-request metadata handed to handlers
//! - [`Arguments`](value::Arguments) - Coerced parameter values in declaration order
//! - [`OperationHandler`](handler::OperationHandler) - The handler interface
//! - [`ResponseContext`] - Response envelope produced for every request
//! - [`InflectorError`] - Standard error types
//! - [`example`] - Example synthesis for operations without a handler

#![doc(html_root_url = "https://docs.rs/inflector-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
pub mod contract;
pub mod document;
mod error;
pub mod example;
pub mod fixtures;
pub mod handler;
mod response;
pub mod schema;
pub mod value;

pub use context::{essence, parse_accept, RequestContext, RequestId};
pub use contract::{
    operation_key, CollectionFormat, Contract, ContractBuilder, Operation, OperationBuilder,
    Parameter, ParameterLocation, ParameterType, PathParams, PrimitiveType, ResponseSpec,
};
pub use error::{
    missing_parameters_message, ErrorCategory, InflectorError, InflectorResult, MissingParameter,
};
pub use handler::{
    ArgKind, FnHandler, HandlerError, HandlerOutput, HandlerResult, ModelNaming, OperationHandler,
    Signature, SignatureMismatch,
};
pub use response::{ApiError, ResponseContext};
pub use schema::{ModelRegistry, Schema};
pub use value::{Arguments, ParamValue};
