//! Error types for Inflector.
//!
//! This module provides the [`InflectorError`] type, the error taxonomy shared
//! by the contract loader, the handler binder and the operation dispatcher.
//!
//! Not every failure is an error. A malformed parameter value collapses into
//! an absent value, and an operation without a handler is answered with a
//! synthesized example. Both are handled where they occur and never show up
//! here.

use crate::contract::ParameterLocation;
use crate::response::ApiError;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`InflectorError`].
pub type InflectorResult<T> = Result<T, InflectorError>;

/// Categories of errors for classification and handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// The request is missing required values.
    Validation,
    /// No operation matches the request path.
    NotFound,
    /// The path matches but the method does not.
    MethodNotAllowed,
    /// The contract or the handler registrations are unusable.
    Configuration,
    /// A handler failed while processing the request.
    Internal,
}

impl ErrorCategory {
    /// Returns the default HTTP status code for this error category.
    #[must_use]
    pub const fn default_status_code(&self) -> StatusCode {
        match self {
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Configuration | Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// A required parameter that had no usable value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingParameter {
    /// Declared parameter name.
    pub name: String,
    /// Where the parameter was expected.
    pub location: ParameterLocation,
}

impl MissingParameter {
    /// Creates a new missing parameter entry.
    #[must_use]
    pub fn new(name: impl Into<String>, location: ParameterLocation) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }
}

impl std::fmt::Display for MissingParameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.location)
    }
}

/// Standard error type for Inflector.
///
/// # Example
///
/// ```
/// use inflector_core::{InflectorError, ErrorCategory};
///
/// let error = InflectorError::contract_load("swagger.yaml", "file not found");
/// assert_eq!(error.category(), ErrorCategory::Configuration);
/// ```
#[derive(Error, Debug)]
pub enum InflectorError {
    /// The contract document could not be read or understood.
    #[error("Contract load error ({location}): {message}")]
    ContractLoad {
        /// Where the contract was read from.
        location: String,
        /// What went wrong.
        message: String,
    },

    /// One or more required parameters coerced to nothing.
    #[error("{}", missing_parameters_message(.missing))]
    MissingParameters {
        /// The offending parameters, in declaration order.
        missing: Vec<MissingParameter>,
    },

    /// A bound handler failed.
    #[error("Handler invocation failed for {operation}: {message}")]
    HandlerInvocation {
        /// Operation the handler was bound to.
        operation: String,
        /// Failure description (not exposed to clients).
        message: String,
    },

    /// A registered handler could not be bound to its operation.
    #[error("Binding error for {operation}: {message}")]
    Binding {
        /// The operation being bound.
        operation: String,
        /// Diagnostic naming the mismatch.
        message: String,
    },

    /// No operation matches the request.
    #[error("Not found: {message}")]
    NotFound {
        /// Human-readable error message.
        message: String,
    },

    /// The path exists but the method is not declared for it.
    #[error("Method not allowed: {message}")]
    MethodNotAllowed {
        /// Human-readable error message.
        message: String,
        /// Methods declared for the path.
        allowed: Vec<http::Method>,
    },

    /// Internal error.
    #[error("Internal error: {message}")]
    Internal {
        /// Human-readable error message.
        message: String,
    },
}

impl InflectorError {
    /// Creates a contract load error.
    #[must_use]
    pub fn contract_load(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ContractLoad {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Creates a missing parameters error.
    #[must_use]
    pub fn missing_parameters(missing: Vec<MissingParameter>) -> Self {
        Self::MissingParameters { missing }
    }

    /// Creates a handler invocation error.
    #[must_use]
    pub fn handler_invocation(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::HandlerInvocation {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Creates a binding error.
    #[must_use]
    pub fn binding(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Binding {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates a method not allowed error.
    #[must_use]
    pub fn method_not_allowed(message: impl Into<String>, allowed: Vec<http::Method>) -> Self {
        Self::MethodNotAllowed {
            message: message.into(),
            allowed,
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingParameters { .. } => ErrorCategory::Validation,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::MethodNotAllowed { .. } => ErrorCategory::MethodNotAllowed,
            Self::ContractLoad { .. } | Self::Binding { .. } => ErrorCategory::Configuration,
            Self::HandlerInvocation { .. } | Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.category().default_status_code()
    }

    /// Returns the message safe to show to clients.
    ///
    /// Server-side failures are reduced to a generic message; their details
    /// belong in the logs.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::MissingParameters { missing } => missing_parameters_message(missing),
            Self::NotFound { message } | Self::MethodNotAllowed { message, .. } => message.clone(),
            Self::HandlerInvocation { .. } => "failed to invoke operation handler".to_string(),
            Self::ContractLoad { .. } | Self::Binding { .. } | Self::Internal { .. } => {
                "internal server error".to_string()
            }
        }
    }

    /// Converts this error to an [`ApiError`] body with the given status.
    #[must_use]
    pub fn to_api_error(&self, status: StatusCode) -> ApiError {
        ApiError::new(status.as_u16(), self.client_message())
    }
}

/// Formats the client message for missing required parameters.
///
/// ```
/// use inflector_core::{missing_parameters_message, MissingParameter};
/// use inflector_core::contract::ParameterLocation;
///
/// let missing = vec![
///     MissingParameter::new("id", ParameterLocation::Query),
///     MissingParameter::new("X-Token", ParameterLocation::Header),
/// ];
/// assert_eq!(
///     missing_parameters_message(&missing),
///     "Missing required Parameters id (query), X-Token (header)"
/// );
/// ```
#[must_use]
pub fn missing_parameters_message(missing: &[MissingParameter]) -> String {
    let mut message = String::from("Missing required Parameter");
    if missing.len() > 1 {
        message.push('s');
    }
    message.push(' ');
    let names: Vec<String> = missing.iter().map(ToString::to_string).collect();
    message.push_str(&names.join(", "));
    message
}
