//! Primary-then-fallback request dispatch

use crate::classify::is_fallback_eligible;
use crate::error::{ApiResult, ErrorContext};
use crate::registry::ClientRegistry;
use crate::request::RequestDescriptor;
use crate::transport::{RawResponse, Transport};
use metrics::counter;
use tracing::{debug, error, info, instrument, Span};

/// Counter of fallback attempts
pub const FALLBACK_ATTEMPTS: &str = "ecopulse_fallback_attempts_total";

/// Counter of fallback outcomes, labelled `outcome=success|failure`
pub const FALLBACK_OUTCOMES: &str = "ecopulse_fallback_outcomes_total";

/// Sends requests to the primary backend and replays network failures
/// against the fallback
///
/// - exactly one fallback attempt, strictly after the primary failed
/// - a fallback success is returned as if the primary had answered
/// - when the fallback fails too, the primary's error is returned
pub struct FallbackDispatcher<T> {
    registry: ClientRegistry<T>,
}

impl<T: Transport> FallbackDispatcher<T> {
    /// Create a dispatcher over a client pair
    pub fn new(registry: ClientRegistry<T>) -> Self {
        Self { registry }
    }

    /// Access the client pair
    pub fn registry(&self) -> &ClientRegistry<T> {
        &self.registry
    }

    /// Send `request`, falling back on network-class failures
    #[instrument(
        skip(self, request),
        fields(method = %request.method, path = %request.path, request_id)
    )]
    pub async fn dispatch(&self, request: &RequestDescriptor) -> ApiResult<RawResponse> {
        if let Some(id) = request.request_id() {
            Span::current().record("request_id", id);
        }

        let primary_error = match self.registry.primary().send(request).await {
            Ok(response) => {
                debug!(status = response.status, "Request succeeded");
                return Ok(response);
            }
            Err(e) => e,
        };

        if !is_fallback_eligible(&primary_error) {
            debug!(error = %primary_error, "Request failed, not eligible for fallback");
            return Err(primary_error);
        }

        let context = ErrorContext {
            request_id: request.request_id().map(str::to_string),
            endpoint: request.path.clone(),
            method: request.method.to_string(),
        };

        counter!(FALLBACK_ATTEMPTS).increment(1);
        info!(
            error = %primary_error,
            fallback = self.registry.fallback().base_url(),
            "Network error with primary API, trying fallback"
        );

        match self.registry.fallback().send(request).await {
            Ok(response) => {
                counter!(FALLBACK_OUTCOMES, "outcome" => "success").increment(1);
                info!(status = response.status, "Fallback succeeded");
                Ok(response)
            }
            Err(fallback_error) => {
                counter!(FALLBACK_OUTCOMES, "outcome" => "failure").increment(1);
                error!(
                    request = %context,
                    primary_error = %primary_error,
                    fallback_error = %fallback_error,
                    "Fallback also failed"
                );
                Err(primary_error)
            }
        }
    }
}
