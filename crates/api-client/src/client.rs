//! Main API client implementation

use crate::config::EndpointsConfig;
use crate::endpoints::{PredictionsApi, TicketsApi};
use crate::error::ApiResult;
use crate::fallback::FallbackDispatcher;
use crate::registry::ClientRegistry;
use crate::request::RequestDescriptor;
use crate::transport::{HttpClient, RawResponse, Transport};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// EcoPulse API client with transparent fallback
///
/// Cheap to clone; clones share the same pair of transports. The client is
/// built explicitly and handed to whoever needs it.
pub struct EcoPulseClient<T = HttpClient> {
    dispatcher: Arc<FallbackDispatcher<T>>,
}

impl<T> Clone for EcoPulseClient<T> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: Arc::clone(&self.dispatcher),
        }
    }
}

impl EcoPulseClient<HttpClient> {
    /// Create a new client with configuration from the environment
    pub fn new() -> ApiResult<Self> {
        let config = EndpointsConfig::from_env()?;
        Self::with_config(&config)
    }

    /// Create a new client with specific configuration
    pub fn with_config(config: &EndpointsConfig) -> ApiResult<Self> {
        Ok(Self::from_registry(ClientRegistry::from_config(config)?))
    }
}

impl<T: Transport> EcoPulseClient<T> {
    /// Create a client over an existing transport pair
    pub fn from_registry(registry: ClientRegistry<T>) -> Self {
        Self {
            dispatcher: Arc::new(FallbackDispatcher::new(registry)),
        }
    }

    /// Get the primary base URL
    #[must_use]
    pub fn primary_url(&self) -> &str {
        self.dispatcher.registry().primary().base_url()
    }

    /// Get the fallback base URL
    #[must_use]
    pub fn fallback_url(&self) -> &str {
        self.dispatcher.registry().fallback().base_url()
    }

    /// Access the transport pair
    #[must_use]
    pub fn registry(&self) -> &ClientRegistry<T> {
        self.dispatcher.registry()
    }

    // -------------------------------------------------------------------------
    // Endpoint API accessors
    // -------------------------------------------------------------------------

    /// Access support ticket endpoints
    #[must_use]
    pub fn tickets(&self) -> TicketsApi<T> {
        TicketsApi::new(self.clone())
    }

    /// Access energy prediction endpoints
    #[must_use]
    pub fn predictions(&self) -> PredictionsApi<T> {
        PredictionsApi::new(self.clone())
    }

    // -------------------------------------------------------------------------
    // Low-level dispatch
    // -------------------------------------------------------------------------

    /// Send a request through the primary, falling back on network errors
    pub async fn send(&self, request: &RequestDescriptor) -> ApiResult<RawResponse> {
        self.dispatcher.dispatch(request).await
    }

    /// Send a request and report how long it took
    pub async fn timed_send(
        &self,
        request: &RequestDescriptor,
    ) -> ApiResult<(RawResponse, Duration)> {
        let start = Instant::now();
        let response = self.send(request).await?;
        Ok((response, start.elapsed()))
    }
}
