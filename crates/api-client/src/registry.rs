//! Primary and fallback client pair

use crate::config::EndpointsConfig;
use crate::error::ApiResult;
use crate::transport::{HttpClient, Transport};

/// Two independently configured transports
///
/// The registry holds no state beyond the transports themselves; each is
/// built from its own configuration.
pub struct ClientRegistry<T> {
    primary: T,
    fallback: T,
}

impl<T: Transport> ClientRegistry<T> {
    /// Pair two transports
    pub fn new(primary: T, fallback: T) -> Self {
        Self { primary, fallback }
    }

    /// Transport every request is sent to first
    pub fn primary(&self) -> &T {
        &self.primary
    }

    /// Transport used when the primary cannot be reached
    pub fn fallback(&self) -> &T {
        &self.fallback
    }
}

impl ClientRegistry<HttpClient> {
    /// Build both HTTP clients from configuration
    pub fn from_config(config: &EndpointsConfig) -> ApiResult<Self> {
        config.validate()?;
        Ok(Self::new(
            HttpClient::new(config.primary.clone())?,
            HttpClient::new(config.fallback.clone())?,
        ))
    }
}
