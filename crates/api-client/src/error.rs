//! Error types for the API client

use std::error::Error as _;
use std::fmt;
use thiserror::Error;

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Why a request never reached a server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkErrorKind {
    /// Connection refused or reset before a response arrived
    Connect,
    /// Host name could not be resolved
    Dns,
    /// The configured timeout elapsed
    Timeout,
    /// Generic transport-level network failure
    Other,
}

impl NetworkErrorKind {
    /// Stable error code, matching the codes the backend's clients log
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Connect => "ECONNREFUSED",
            Self::Dns => "ENOTFOUND",
            Self::Timeout => "ETIMEDOUT",
            Self::Other => "ERR_NETWORK",
        }
    }
}

impl fmt::Display for NetworkErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// API client errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// No response reached us
    #[error("Network error ({kind}): {message}")]
    Network {
        /// Failure category
        kind: NetworkErrorKind,
        /// Transport message
        message: String,
    },

    /// API returned an error response
    #[error("API error ({status}): {message}")]
    ApiResponse {
        /// HTTP status code
        status: u16,
        /// Error message from API
        message: String,
    },

    /// HTTP client failure that is not network related (builder, redirect, decode)
    #[error("HTTP request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing environment variable
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Caller input or response payload failed validation
    #[error("Validation error: {0}")]
    Validation(String),
}

impl ApiError {
    /// Create a network error
    pub fn network(kind: NetworkErrorKind, message: impl Into<String>) -> Self {
        Self::Network {
            kind,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a missing env var error
    pub fn missing_env(var: impl Into<String>) -> Self {
        Self::MissingEnvVar(var.into())
    }

    /// Create an API response error
    pub fn api_response(status: u16, message: impl Into<String>) -> Self {
        Self::ApiResponse {
            status,
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// HTTP status carried by the error, if a response was received
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiResponse { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Network error code, if the request never reached a server
    #[must_use]
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::Network { kind, .. } => Some(kind.code()),
            _ => None,
        }
    }

    /// Check if the request never reached a server
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiResponse { status, .. } if (400..500).contains(status))
    }

    /// Check if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiResponse { status, .. } if *status >= 500)
    }

    /// Message suitable for showing to an end user
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::ApiResponse { message, .. } | Self::Validation(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::api_response(status.as_u16(), err.to_string());
        }

        let kind = if err.is_timeout() {
            Some(NetworkErrorKind::Timeout)
        } else if err.is_connect() {
            if source_chain_mentions(&err, &["dns error", "failed to lookup"]) {
                Some(NetworkErrorKind::Dns)
            } else {
                Some(NetworkErrorKind::Connect)
            }
        } else if err.is_request() || err.is_body() {
            Some(NetworkErrorKind::Other)
        } else {
            None
        };

        match kind {
            Some(kind) => Self::network(kind, describe_chain(&err)),
            None => Self::Request(err),
        }
    }
}

impl From<ecopulse_core::Error> for ApiError {
    fn from(err: ecopulse_core::Error) -> Self {
        Self::Validation(err.message)
    }
}

fn source_chain_mentions(err: &reqwest::Error, needles: &[&str]) -> bool {
    let mut source = err.source();
    while let Some(inner) = source {
        let text = inner.to_string().to_lowercase();
        if needles.iter().any(|needle| text.contains(needle)) {
            return true;
        }
        source = inner.source();
    }
    false
}

fn describe_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}

/// Error context for better debugging
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// Request ID for correlation
    pub request_id: Option<String>,
    /// Endpoint that was called
    pub endpoint: String,
    /// HTTP method used
    pub method: String,
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.endpoint)?;
        if let Some(ref id) = self.request_id {
            write!(f, " (request_id: {id})")?;
        }
        Ok(())
    }
}
