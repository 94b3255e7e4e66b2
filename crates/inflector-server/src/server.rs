//! HTTP server.
//!
//! Built on Hyper and Tokio. Every request body is collected (up to the
//! configured limit), handed to the [`Inflector`] on the blocking pool, and
//! the resulting [`ResponseContext`] is rendered in its negotiated media type.
//!
//! # Example
//!
//! ```rust,ignore
//! use inflector_server::{DispatchConfig, HandlerRegistry, Inflector, Server};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let contract = Arc::new(inflector_core::Contract::from_path("swagger.yaml")?);
//!     let inflector = Inflector::new(contract, &HandlerRegistry::new(), &DispatchConfig::default())?;
//!
//!     Server::builder()
//!         .http_addr("0.0.0.0:8080")
//!         .inflector(inflector)
//!         .build()?
//!         .run()
//!         .await?;
//!     Ok(())
//! }
//! ```

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use http::{Method, Request, Response, StatusCode};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};
use tracing::Instrument;

use inflector_core::{InflectorError, RequestId, ResponseContext};
use inflector_extract::{ExtractionContext, ExtractionError, ExtractionSource};
use inflector_telemetry::{fields, log_request_complete, log_request_error};

use crate::config::{ServerConfig, ServerConfigBuilder};
use crate::dispatcher::REQUEST_ID_HEADER;
use crate::serialize::APPLICATION_JSON;
use crate::shutdown::{ConnectionTracker, ShutdownSignal};
use crate::table::Inflector;

/// Response body type.
pub type ResponseBody = Full<Bytes>;

/// HTTP response type.
pub type HttpResponse = Response<ResponseBody>;

const HEALTH_PATH: &str = "/health";

/// Errors that stop the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The listener could not be bound.
    #[error("bind error: {0}")]
    Bind(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The server was built without an operation table.
    #[error("no operation table configured")]
    MissingInflector,
}

/// The Inflector HTTP server.
#[derive(Debug)]
pub struct Server {
    config: ServerConfig,
    inflector: Arc<Inflector>,
}

impl Server {
    /// Creates a server for an operation table.
    #[must_use]
    pub fn new(config: ServerConfig, inflector: Inflector) -> Self {
        Self {
            config,
            inflector: Arc::new(inflector),
        }
    }

    /// Creates a server builder.
    #[must_use]
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    /// Returns the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the operation table.
    #[must_use]
    pub fn inflector(&self) -> &Arc<Inflector> {
        &self.inflector
    }

    /// Runs until SIGTERM or Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured address is invalid or cannot be
    /// bound.
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_with_shutdown(ShutdownSignal::with_os_signals()).await
    }

    /// Runs until the given signal is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured address is invalid or cannot be
    /// bound.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let addr = self.config.socket_addr().map_err(|e| {
            ServerError::Bind(format!("invalid address '{}': {e}", self.config.http_addr()))
        })?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(format!("failed to bind to {addr}: {e}")))?;

        self.run_on(listener, shutdown).await
    }

    /// Serves connections from an already bound listener until shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener's local address cannot be read.
    pub async fn run_on(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), ServerError> {
        let local_addr = listener.local_addr()?;
        tracing::info!(
            addr = %local_addr,
            base_path = %self.inflector.contract().base_path(),
            "Server listening"
        );

        let server = Arc::new(self);
        let tracker = ConnectionTracker::new();

        loop {
            tokio::select! {
                result = listener.accept() => match result {
                    Ok((stream, remote_addr)) => {
                        let server = Arc::clone(&server);
                        let token = tracker.acquire();
                        let shutdown = shutdown.clone();

                        tokio::spawn(async move {
                            if let Err(e) = server.handle_connection(stream, remote_addr, shutdown).await {
                                tracing::debug!(remote = %remote_addr, error = %e, "Connection error");
                            }
                            drop(token);
                        });
                    }
                    Err(e) => tracing::error!(error = %e, "Failed to accept connection"),
                },
                () = shutdown.recv() => {
                    tracing::info!("Shutdown signal received, stopping server");
                    break;
                }
            }
        }

        let shutdown_timeout = server.config.shutdown_timeout();
        tracing::info!(
            timeout = ?shutdown_timeout,
            active = tracker.active_connections(),
            "Waiting for connections to close"
        );
        if tokio::time::timeout(shutdown_timeout, tracker.wait_idle())
            .await
            .is_err()
        {
            tracing::warn!(
                active = tracker.active_connections(),
                "Shutdown timeout reached with connections still open"
            );
        }

        tracing::info!("Server stopped");
        Ok(())
    }

    async fn handle_connection(
        self: &Arc<Self>,
        stream: TcpStream,
        remote_addr: SocketAddr,
        shutdown: ShutdownSignal,
    ) -> Result<(), hyper::Error> {
        let io = TokioIo::new(stream);
        let server = Arc::clone(self);
        let service = service_fn(move |req: Request<Incoming>| {
            let server = Arc::clone(&server);
            async move { Ok::<_, Infallible>(server.respond(req).await) }
        });

        let conn = http1::Builder::new().serve_connection(io, service);
        tokio::pin!(conn);

        tokio::select! {
            result = conn.as_mut() => result,
            () = shutdown.recv() => {
                tracing::debug!(remote = %remote_addr, "Closing connection for shutdown");
                conn.as_mut().graceful_shutdown();
                conn.await
            }
        }
    }

    /// Answers one request.
    ///
    /// Generic over the body so it can be driven without a socket.
    pub async fn respond<B>(&self, req: Request<B>) -> HttpResponse
    where
        B: Body<Data = Bytes> + Send + 'static,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        if req.method() == Method::GET && req.uri().path() == HEALTH_PATH {
            return health_response();
        }

        let request_id = req
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(RequestId::parse)
            .unwrap_or_default();

        let span = tracing::info_span!(
            "request",
            request_id = %request_id,
            http.method = %req.method(),
            http.path = %req.uri().path(),
            operation = tracing::field::Empty,
        );

        async move {
            let started = std::time::Instant::now();
            let response = self.respond_inner(req, request_id).await;
            let status = response.status().as_u16();
            let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
            log_request_complete!(request_id, status, duration_ms);
            response
        }
        .instrument(span)
        .await
    }

    async fn respond_inner<B>(&self, req: Request<B>, request_id: RequestId) -> HttpResponse
    where
        B: Body<Data = Bytes> + Send + 'static,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let (mut parts, body) = req.into_parts();
        let body = match self.collect_body(&parts.headers, body).await {
            Ok(body) => body,
            Err(e) => {
                log_request_error!(request_id, e);
                let response = ResponseContext::error(e.status_code(), e.to_string());
                return self.render(response, request_id);
            }
        };

        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            parts
                .headers
                .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
        }

        if let Some((operation, _)) = self
            .inflector
            .contract()
            .match_operation(&parts.method, parts.uri.path())
        {
            tracing::Span::current().record(fields::OPERATION, operation.key().as_str());
        }

        let ctx = ExtractionContext::new(parts.method, parts.uri, parts.headers, body);
        let inflector = Arc::clone(&self.inflector);
        let response = match tokio::task::spawn_blocking(move || inflector.handle(ctx)).await {
            Ok(response) => response,
            Err(e) => {
                let error = InflectorError::internal(format!("dispatch task failed: {e}"));
                log_request_error!(request_id, error);
                ResponseContext::error(error.status_code(), error.client_message())
            }
        };

        self.render(response, request_id)
    }

    async fn collect_body<B>(
        &self,
        headers: &http::HeaderMap,
        body: B,
    ) -> Result<Bytes, ExtractionError>
    where
        B: Body<Data = Bytes>,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let max = self.config.max_body_size();
        let declared = headers
            .get(CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<usize>().ok());

        if let Some(length) = declared.filter(|length| *length > max) {
            return Err(ExtractionError::payload_too_large(max, length));
        }

        match Limited::new(body, max).collect().await {
            Ok(collected) => Ok(collected.to_bytes()),
            Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => Err(
                ExtractionError::payload_too_large(max, declared.unwrap_or(max.saturating_add(1))),
            ),
            Err(e) => Err(ExtractionError::malformed(ExtractionSource::Body, e.to_string())),
        }
    }

    fn render(&self, response: ResponseContext, request_id: RequestId) -> HttpResponse {
        let mut builder = Response::builder().status(response.status());

        for (name, value) in response.headers() {
            if name.eq_ignore_ascii_case(CONTENT_TYPE.as_str()) {
                continue;
            }
            match (HeaderName::try_from(name.as_str()), HeaderValue::try_from(value.as_str())) {
                (Ok(name), Ok(value)) => builder = builder.header(name, value),
                _ => tracing::warn!(header = %name, "Skipping invalid response header"),
            }
        }
        builder = builder.header(REQUEST_ID_HEADER, request_id.to_string());

        let body = match response.entity() {
            None => Bytes::new(),
            Some(entity) => {
                match self.inflector.serialization().render(entity, response.content_type()) {
                    Ok(rendered) => {
                        builder = builder.header(CONTENT_TYPE, rendered.content_type);
                        rendered.bytes
                    }
                    Err(e) => {
                        log_request_error!(request_id, e);
                        return internal_error_response(request_id);
                    }
                }
            }
        };

        builder
            .body(Full::new(body))
            .unwrap_or_else(|_| internal_error_response(request_id))
    }
}

fn health_response() -> HttpResponse {
    let mut response = Response::new(Full::new(Bytes::from_static(br#"{"status":"healthy"}"#)));
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
    response
}

fn internal_error_response(request_id: RequestId) -> HttpResponse {
    let body = serde_json::json!({
        "code": StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
        "message": "internal server error",
    });
    let mut response = Response::new(Full::new(Bytes::from(body.to_string())));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }
    response
}

/// Builder for [`Server`].
#[derive(Debug, Default)]
pub struct ServerBuilder {
    config_builder: ServerConfigBuilder,
    inflector: Option<Inflector>,
}

impl ServerBuilder {
    /// Creates a builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP bind address.
    #[must_use]
    pub fn http_addr(mut self, addr: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.http_addr(addr);
        self
    }

    /// Sets the shutdown drain timeout.
    #[must_use]
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.config_builder = self.config_builder.shutdown_timeout(timeout);
        self
    }

    /// Sets the largest accepted request body, in bytes.
    #[must_use]
    pub fn max_body_size(mut self, bytes: usize) -> Self {
        self.config_builder = self.config_builder.max_body_size(bytes);
        self
    }

    /// Replaces all listener settings.
    #[must_use]
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config_builder = ServerConfigBuilder::from(config);
        self
    }

    /// Sets the operation table.
    #[must_use]
    pub fn inflector(mut self, inflector: Inflector) -> Self {
        self.inflector = Some(inflector);
        self
    }

    /// Builds the server.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::MissingInflector`] if no operation table was
    /// set.
    pub fn build(self) -> Result<Server, ServerError> {
        let inflector = self.inflector.ok_or(ServerError::MissingInflector)?;
        Ok(Server::new(self.config_builder.build(), inflector))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::HandlerRegistry;
    use crate::config::DispatchConfig;
    use inflector_core::fixtures::PETSTORE_YAML;
    use inflector_core::Contract;

    fn server(max_body_size: usize) -> Server {
        let contract = Arc::new(Contract::from_yaml_str(PETSTORE_YAML).expect("fixture loads"));
        let inflector = Inflector::new(contract, &HandlerRegistry::new(), &DispatchConfig::default())
            .expect("table builds");
        Server::builder()
            .http_addr("127.0.0.1:0")
            .max_body_size(max_body_size)
            .shutdown_timeout(Duration::from_millis(100))
            .inflector(inflector)
            .build()
            .expect("server builds")
    }

    fn request(method: Method, uri: &str, body: &'static str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Full::new(Bytes::from_static(body.as_bytes())))
            .expect("valid request")
    }

    async fn body_json(response: HttpResponse) -> serde_json::Value {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body collects")
            .to_bytes();
        serde_json::from_slice(&bytes).expect("json body")
    }

    // ==================== Builder Tests ====================

    #[test]
    fn test_builder_requires_inflector() {
        let result = Server::builder().build();
        assert!(matches!(result, Err(ServerError::MissingInflector)));
    }

    #[test]
    fn test_builder_applies_config() {
        let server = server(1024);
        assert_eq!(server.config().http_addr(), "127.0.0.1:0");
        assert_eq!(server.config().max_body_size(), 1024);
    }

    // ==================== Request Tests ====================

    #[tokio::test]
    async fn test_health() {
        let response = server(1024).respond(request(Method::GET, "/health", "")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!({ "status": "healthy" }));
    }

    #[tokio::test]
    async fn test_mocked_operation_renders_json() {
        let response = server(1024)
            .respond(request(Method::GET, "/v2/store/inventory", ""))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).map(HeaderValue::as_bytes),
            Some(APPLICATION_JSON.as_bytes())
        );
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
        assert_eq!(body_json(response).await, serde_json::json!({ "key": 0 }));
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let response = server(1024).respond(request(Method::GET, "/v2/nothing", "")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["code"], 404);
    }

    #[tokio::test]
    async fn test_body_over_limit() {
        let response = server(8)
            .respond(request(Method::POST, "/v2/pet", r#"{"name":"doggie"}"#))
            .await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body_json(response).await["code"], 413);
    }

    #[tokio::test]
    async fn test_declared_length_over_limit() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/v2/pet")
            .header(CONTENT_LENGTH, "4096")
            .body(Full::new(Bytes::new()))
            .expect("valid request");
        let response = server(8).respond(req).await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let id = RequestId::new().to_string();
        let req = Request::builder()
            .uri("/v2/store/inventory")
            .header(REQUEST_ID_HEADER, id.as_str())
            .body(Full::new(Bytes::new()))
            .expect("valid request");
        let response = server(1024).respond(req).await;
        assert_eq!(
            response.headers().get(REQUEST_ID_HEADER).map(HeaderValue::as_bytes),
            Some(id.as_bytes())
        );
    }

    // ==================== Lifecycle Tests ====================

    #[tokio::test]
    async fn test_invalid_address() {
        let contract = Arc::new(Contract::from_yaml_str(PETSTORE_YAML).expect("fixture loads"));
        let inflector = Inflector::new(contract, &HandlerRegistry::new(), &DispatchConfig::default())
            .expect("table builds");
        let server = Server::builder()
            .http_addr("not an address")
            .inflector(inflector)
            .build()
            .expect("server builds");

        let result = server.run_with_shutdown(ShutdownSignal::new()).await;
        assert!(matches!(result, Err(ServerError::Bind(_))));
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let shutdown = ShutdownSignal::new();
        let handle = tokio::spawn(server(1024).run_on(listener, shutdown.clone()));

        shutdown.trigger();
        let result = tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("server stops")
            .expect("task joins");
        assert!(result.is_ok());
    }
}
