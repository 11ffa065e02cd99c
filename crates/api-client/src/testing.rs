//! Scripted in-memory transport for tests
//!
//! ```rust,ignore
//! use ecopulse_api_client::testing::{MockReply, MockTransport};
//! use serde_json::json;
//!
//! let primary = MockTransport::new("http://primary.test")
//!     .with_reply(MockReply::json(200, json!({"success": true, "data": []})));
//! assert_eq!(primary.call_count(), 0);
//! ```

use crate::error::{ApiError, ApiResult, NetworkErrorKind};
use crate::request::RequestDescriptor;
use crate::transport::{RawResponse, Transport};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

/// One scripted outcome
#[derive(Debug, Clone, PartialEq)]
pub enum MockReply {
    /// 2xx response with a JSON body
    Json(u16, Value),
    /// 2xx response without a body
    Empty(u16),
    /// Error status with a message
    Status(u16, String),
    /// The request never reached a server
    Network(NetworkErrorKind),
}

impl MockReply {
    pub fn json(status: u16, body: Value) -> Self {
        Self::Json(status, body)
    }

    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status(status, message.into())
    }

    pub fn refused() -> Self {
        Self::Network(NetworkErrorKind::Connect)
    }

    fn into_result(self) -> ApiResult<RawResponse> {
        match self {
            Self::Json(status, body) => Ok(RawResponse::json(status, body)),
            Self::Empty(status) => Ok(RawResponse::empty(status)),
            Self::Status(status, message) => Err(ApiError::api_response(status, message)),
            Self::Network(kind) => Err(ApiError::network(kind, "Network Error")),
        }
    }
}

/// Transport that replays scripted replies and records every request
///
/// Queued replies are consumed in order; once the queue is empty the
/// default reply (a network error unless overridden) is returned.
#[derive(Debug)]
pub struct MockTransport {
    base_url: String,
    replies: Mutex<VecDeque<MockReply>>,
    default_reply: MockReply,
    calls: Mutex<Vec<RequestDescriptor>>,
}

impl MockTransport {
    /// Create a transport with no scripted replies
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            replies: Mutex::new(VecDeque::new()),
            default_reply: MockReply::Network(NetworkErrorKind::Other),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a reply
    #[must_use]
    pub fn with_reply(self, reply: MockReply) -> Self {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(reply);
        self
    }

    /// Reply used once the queue is exhausted
    #[must_use]
    pub fn with_default_reply(mut self, reply: MockReply) -> Self {
        self.default_reply = reply;
        self
    }

    /// Requests received so far
    pub fn calls(&self) -> Vec<RequestDescriptor> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests received so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Transport for MockTransport {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, request: &RequestDescriptor) -> ApiResult<RawResponse> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        let reply = self
            .replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| self.default_reply.clone());

        reply.into_result()
    }
}
