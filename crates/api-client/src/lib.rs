//! Resilient API client for the EcoPulse backends
//!
//! Every request goes to the primary backend first. When it fails without
//! any response (connection refused, DNS failure, timeout) the identical
//! request is replayed once against the fallback backend. Responses in any
//! of the backends' shapes are normalized into a single
//! `{success, data, message}` envelope.
//!
//! # Features
//!
//! - **Environment-based configuration**: Load URLs and tokens from environment variables
//! - **Transparent fallback**: One replay on network-class failures, never on HTTP errors
//! - **Response normalization**: Envelopes, bare objects and bare arrays become one shape
//! - **Request correlation**: Track requests with unique IDs for debugging
//!
//! # Example
//!
//! ```rust,no_run
//! use ecopulse_api_client::EcoPulseClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = EcoPulseClient::new()?;
//!
//!     let tickets = client.tickets().user_tickets().await;
//!     if tickets.success {
//!         println!("{} tickets", tickets.data.as_array().map_or(0, Vec::len));
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod classify;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod fallback;
pub mod normalize;
pub mod registry;
pub mod request;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;
pub mod transport;

pub use classify::{classify, FailureClass};
pub use client::EcoPulseClient;
pub use config::{ClientConfig, EndpointsConfig};
pub use error::{ApiError, ApiResult, NetworkErrorKind};
pub use normalize::{normalize, Expected, NormalizedResult};
pub use request::RequestDescriptor;
pub use transport::{HttpClient, RawResponse, Transport};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::EcoPulseClient;
    pub use crate::config::{ClientConfig, EndpointsConfig};
    pub use crate::endpoints::{EnergySource, PredictionsApi, TicketFilters, TicketStatus, TicketsApi};
    pub use crate::error::{ApiError, ApiResult};
    pub use crate::normalize::NormalizedResult;
}
