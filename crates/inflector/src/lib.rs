//! # Inflector
//!
//! A contract-driven request dispatcher for Swagger 2.0 APIs.
//!
//! Inflector reads an API contract and serves every operation it declares:
//! parameters are extracted and coerced to their declared types, required
//! parameters are enforced, and each request goes to the handler registered
//! for its operation. Operations without a handler answer with an example
//! synthesized from the response schema, so a contract alone is a working
//! mock server.
//!
//! ## Example
//!
//! ```no_run
//! use inflector::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut registry = HandlerRegistry::new();
//!     registry.register_fn(
//!         HandlerKey::named("io.swagger.sample.controllers.Pet", "getPetById"),
//!         Signature::new([ArgKind::Long]),
//!         |_ctx, args| {
//!             let id = args.i64("petId").unwrap_or_default();
//!             Ok(HandlerOutput::Value(serde_json::json!({ "id": id, "name": "doggie" })))
//!         },
//!     );
//!
//!     let config = ConfigLoader::new().with_optional_file("inflector.yaml")?.load()?;
//!     build_server(&config, &registry)?.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Request flow
//!
//! ```text
//! Request → match operation → extract & coerce → check required
//!                                                     ↓
//! Response ← render ← handler (bound) or example (mocked)
//! ```

#![doc(html_root_url = "https://docs.rs/inflector/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod app;

pub use app::{build_server, StartupError};

pub use inflector_config as config;
pub use inflector_core as core;
pub use inflector_extract as extract;
pub use inflector_server as server;
pub use inflector_telemetry as telemetry;

pub use inflector_config::{ConfigLoader, InflectorConfig};
pub use inflector_core::{Contract, InflectorError, InflectorResult};
pub use inflector_server::{DispatchConfig, HandlerKey, HandlerRegistry, Inflector, Server};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports for applications that register handlers.
///
/// ```rust
/// use inflector::prelude::*;
/// ```
pub mod prelude {
    pub use inflector_config::{ConfigLoader, InflectorConfig, ENV_PREFIX};
    pub use inflector_core::{
        ApiError, ArgKind, Arguments, Contract, FnHandler, HandlerError, HandlerOutput,
        HandlerResult, OperationHandler, ParamValue, RequestContext, ResponseContext, Signature,
    };
    pub use inflector_server::{
        DispatchConfig, HandlerKey, HandlerRegistry, Inflector, Server, ShutdownSignal,
    };

    pub use crate::build_server;
}
