//! Wiring configuration, contract and handlers into a server.

use std::sync::Arc;

use inflector_config::{ConfigError, InflectorConfig};
use inflector_core::{Contract, InflectorError};
use inflector_server::{HandlerRegistry, Inflector, Server, ServerError};
use thiserror::Error;

/// Errors that prevent the server from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The contract did not load or an operation failed to bind.
    #[error(transparent)]
    Contract(#[from] InflectorError),

    /// The server could not be assembled.
    #[error(transparent)]
    Server(#[from] ServerError),
}

/// Loads the configured contract, binds the registered handlers and builds
/// the server.
///
/// Operations without a registered handler are answered with mock
/// responses.
///
/// # Example
///
/// ```no_run
/// use inflector::{build_server, HandlerRegistry, InflectorConfig};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let server = build_server(&InflectorConfig::default(), &HandlerRegistry::new())?;
/// server.run().await?;
/// # Ok(())
/// # }
/// ```
pub fn build_server(
    config: &InflectorConfig,
    registry: &HandlerRegistry,
) -> Result<Server, StartupError> {
    let contract = Contract::from_path(&config.dispatch.swagger_url).map_err(|e| {
        tracing::error!(
            location = %config.dispatch.swagger_url,
            error = %e,
            "no contract definition detected"
        );
        e
    })?;

    let inflector = Inflector::new(Arc::new(contract), registry, &config.dispatch_config()?)?;
    let server = Server::builder()
        .config(config.server_config())
        .inflector(inflector)
        .build()?;
    Ok(server)
}
