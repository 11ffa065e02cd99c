//! HTTP transport
//!
//! [`Transport`] is the seam between request dispatch and the wire. The
//! production implementation, [`HttpClient`], wraps a `reqwest::Client`
//! configured from a single [`ClientConfig`].

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::request::RequestDescriptor;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

const CLIENT_USER_AGENT: &str = concat!("ecopulse-api-client/", env!("CARGO_PKG_VERSION"));

/// A successful (2xx) response
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Parsed JSON payload; `None` when the server sent no body
    pub body: Option<Value>,
}

impl RawResponse {
    /// Response with a JSON payload
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    /// Response without a payload
    pub fn empty(status: u16) -> Self {
        Self { status, body: None }
    }

    /// Borrow the payload
    #[must_use]
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

/// Issues requests against one backend
///
/// Non-2xx responses are reported as [`ApiError::ApiResponse`]; failures
/// before any response arrived are [`ApiError::Network`]. A body that cannot
/// be read once the status line arrived keeps that status.
pub trait Transport: Send + Sync {
    /// Base URL requests are joined onto
    fn base_url(&self) -> &str;

    /// Send a request and wait for its response
    fn send(
        &self,
        request: &RequestDescriptor,
    ) -> impl Future<Output = ApiResult<RawResponse>> + Send;
}

/// `reqwest`-backed transport bound to one [`ClientConfig`]
#[derive(Clone)]
pub struct HttpClient {
    inner: Client,
    config: Arc<ClientConfig>,
}

impl HttpClient {
    /// Build a client, failing on invalid configuration
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        for (name, value) in &config.default_headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ApiError::config(format!("invalid header name {name:?}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ApiError::config(format!("invalid value for header {name}: {e}")))?;
            default_headers.insert(name, value);
        }
        default_headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

        if let Some(ref token) = config.auth_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| ApiError::config("auth token contains invalid header characters"))?;
            value.set_sensitive(true);
            default_headers.insert(AUTHORIZATION, value);
        }

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .cookie_store(config.with_credentials)
            .build()
            .map_err(ApiError::Request)?;

        Ok(Self {
            inner,
            config: Arc::new(config),
        })
    }

    /// Get the configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl Transport for HttpClient {
    fn base_url(&self) -> &str {
        &self.config.base_url
    }

    async fn send(&self, request: &RequestDescriptor) -> ApiResult<RawResponse> {
        let url = self.config.url_for(&request.path);
        let start = Instant::now();

        let mut builder = self.inner.request(request.method.clone(), &url);
        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| body_read_error(status, &e))?;

        debug!(
            request_id = request.request_id().unwrap_or_default(),
            url = %url,
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Response received"
        );

        if status.is_success() {
            Ok(RawResponse {
                status: status.as_u16(),
                body: parse_body(&text)?,
            })
        } else {
            Err(ApiError::api_response(status.as_u16(), error_message(status, &text)))
        }
    }
}

/// Parse a response body as JSON
///
/// Empty bodies yield `None`. Bodies containing bare `NaN`/`Infinity`
/// tokens (emitted by the prediction service) are retried with those
/// tokens replaced by `null`.
pub fn parse_body(text: &str) -> ApiResult<Option<Value>> {
    if text.trim().is_empty() {
        return Ok(None);
    }

    match serde_json::from_str(text) {
        Ok(value) => Ok(Some(value)),
        Err(strict_error) => {
            let cleaned = replace_non_finite(text);
            if cleaned == text {
                return Err(strict_error.into());
            }
            match serde_json::from_str(&cleaned) {
                Ok(value) => {
                    warn!("Response contained non-finite numbers; replaced with null");
                    Ok(Some(value))
                }
                Err(_) => Err(strict_error.into()),
            }
        }
    }
}

/// Replace `NaN`, `Infinity` and `-Infinity` outside of strings with `null`
fn replace_non_finite(text: &str) -> String {
    const TOKENS: [&str; 3] = ["-Infinity", "Infinity", "NaN"];

    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
        } else if let Some(token) = TOKENS.iter().find(|t| rest.starts_with(*t)) {
            out.push_str("null");
            rest = &rest[token.len()..];
            continue;
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }

    out
}

fn body_read_error(status: StatusCode, err: &reqwest::Error) -> ApiError {
    ApiError::api_response(status.as_u16(), format!("Failed to read response body: {err}"))
}

/// Best message for an error response: the JSON `message` field, the raw
/// text, or the generic status line
fn error_message(status: StatusCode, text: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(text) {
        if let Some(message) = map.get("message").and_then(Value::as_str) {
            return message.to_string();
        }
    }

    let trimmed = text.trim();
    if !trimmed.is_empty() && trimmed.len() <= 512 && !trimmed.starts_with('<') {
        return trimmed.to_string();
    }

    format!("Request failed with status code {}", status.as_u16())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetworkErrorKind;
    use serde_json::json;

    #[test]
    fn test_parse_empty_body() {
        assert_eq!(parse_body("").unwrap(), None);
        assert_eq!(parse_body("  \n").unwrap(), None);
    }

    #[test]
    fn test_parse_null_body_is_present() {
        assert_eq!(parse_body("null").unwrap(), Some(Value::Null));
    }

    #[test]
    fn test_parse_nan_tokens() {
        let body = parse_body(r#"{"a": NaN, "b": [1, -Infinity], "c": "NaN stays"}"#).unwrap();
        assert_eq!(body, Some(json!({"a": null, "b": [1, null], "c": "NaN stays"})));
    }

    #[test]
    fn test_parse_invalid_json_errors() {
        assert!(matches!(parse_body("{oops"), Err(ApiError::Json(_))));
    }

    #[test]
    fn test_replace_non_finite_respects_escapes() {
        let text = r#"["a\"NaN", NaN]"#;
        assert_eq!(replace_non_finite(text), r#"["a\"NaN", null]"#);
    }

    #[test]
    fn test_error_message_prefers_json_message() {
        let msg = error_message(
            StatusCode::NOT_FOUND,
            r#"{"success": false, "message": "Ticket not found"}"#,
        );
        assert_eq!(msg, "Ticket not found");
    }

    #[test]
    fn test_error_message_generic() {
        let msg = error_message(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert_eq!(msg, "Request failed with status code 502");
        assert_eq!(error_message(StatusCode::UNAUTHORIZED, "denied"), "denied");
    }

    #[test]
    fn test_client_rejects_bad_header() {
        let config = ClientConfig::new("http://localhost:5000").with_header("bad header", "x");
        assert!(matches!(HttpClient::new(config), Err(ApiError::Config(_))));
    }

    #[test]
    fn test_client_creation() {
        let config = ClientConfig::new("http://localhost:5000/api").with_auth_token("abc");
        let client = HttpClient::new(config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000/api");
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = HttpClient::new(ClientConfig::new(format!("http://{addr}"))).unwrap();
        let err = client
            .send(&RequestDescriptor::get("/ticket/user"))
            .await
            .unwrap_err();

        assert!(
            matches!(err, ApiError::Network { kind: NetworkErrorKind::Connect, .. }),
            "unexpected error: {err:?}"
        );
    }

    #[tokio::test]
    async fn test_truncated_body_keeps_status() {
        use std::io::{Read, Write};

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf);
            stream
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\n{\"succ")
                .unwrap();
        });

        let client = HttpClient::new(ClientConfig::new(format!("http://{addr}"))).unwrap();
        let err = client
            .send(&RequestDescriptor::get("/ticket/stats"))
            .await
            .unwrap_err();
        server.join().unwrap();

        assert_eq!(err.status(), Some(200), "unexpected error: {err:?}");
        assert!(!crate::classify::is_fallback_eligible(&err));
    }
}
