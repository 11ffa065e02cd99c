//! Replayable request descriptions

use crate::error::ApiResult;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Request correlation ID header
pub const X_REQUEST_ID: &str = "X-Request-ID";

/// Everything needed to issue a request against any base URL
///
/// Descriptors are captured once and sent unchanged to the primary and,
/// on fallback, to the secondary backend. The correlation ID header is
/// part of the descriptor so both attempts share it.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    /// HTTP method
    pub method: Method,
    /// Path relative to the client's base URL
    pub path: String,
    /// Query string pairs, in order
    pub params: Vec<(String, String)>,
    /// JSON body
    pub body: Option<Value>,
    /// Per-request headers (on top of the client defaults)
    pub headers: BTreeMap<String, String>,
}

impl RequestDescriptor {
    /// Create a descriptor with a fresh correlation ID
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert(X_REQUEST_ID.to_string(), Uuid::new_v4().to_string());
        Self {
            method,
            path: path.into(),
            params: Vec::new(),
            body: None,
            headers,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// POST with a JSON body
    pub fn post<B: Serialize>(path: impl Into<String>, body: &B) -> ApiResult<Self> {
        Self::new(Method::POST, path).with_json(body)
    }

    /// PUT with a JSON body
    pub fn put<B: Serialize>(path: impl Into<String>, body: &B) -> ApiResult<Self> {
        Self::new(Method::PUT, path).with_json(body)
    }

    /// Builder-style method to attach a JSON body
    pub fn with_json<B: Serialize>(mut self, body: &B) -> ApiResult<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Builder-style method to append a query parameter
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Builder-style method to append several query parameters
    #[must_use]
    pub fn with_params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Builder-style method to set a header
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// The correlation ID, if present
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.headers.get(X_REQUEST_ID).map(String::as_str)
    }
}
