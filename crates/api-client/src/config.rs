//! Configuration for the EcoPulse API client
//!
//! Two endpoints are configured: the primary Node backend and a fallback
//! deployment used when the primary cannot be reached. Both load from
//! environment variables (with hardcoded defaults) or from a TOML file.

use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::Path;
use std::time::Duration;

/// Default primary API URL
pub const DEFAULT_PRIMARY_URL: &str = "https://ecopulsebackend-1.onrender.com/api";

/// Default fallback API URL
pub const DEFAULT_FALLBACK_URL: &str = "https://ecopulsebackend.onrender.com";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variables consulted for the primary base URL, in order
pub const PRIMARY_URL_VARS: &[&str] = &["ECOPULSE_API_URL", "VITE_API_URL"];

/// Environment variables consulted for the fallback base URL, in order
pub const FALLBACK_URL_VARS: &[&str] = &["ECOPULSE_FALLBACK_API_URL", "VITE_RAILWAY_API_URL"];

/// Request timeout override, in whole seconds
pub const TIMEOUT_VAR: &str = "ECOPULSE_TIMEOUT_SECS";

/// Bearer token sent by both clients
pub const AUTH_TOKEN_VAR: &str = "ECOPULSE_AUTH_TOKEN";

/// Configuration of a single backend client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL every request path is joined onto
    pub base_url: String,
    /// Request timeout
    #[serde(
        rename = "timeout_secs",
        with = "duration_secs",
        default = "default_timeout"
    )]
    pub timeout: Duration,
    /// Headers sent with every request
    #[serde(default = "default_headers")]
    pub default_headers: BTreeMap<String, String>,
    /// Keep and send cookies (session auth)
    #[serde(default = "default_with_credentials")]
    pub with_credentials: bool,
    /// Bearer token sent as `Authorization`
    #[serde(default, skip_serializing)]
    pub auth_token: Option<String>,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

fn default_headers() -> BTreeMap<String, String> {
    BTreeMap::from([("Content-Type".to_string(), "application/json".to_string())])
}

fn default_with_credentials() -> bool {
    true
}

impl ClientConfig {
    /// Create a configuration for `base_url` with default settings
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            default_headers: default_headers(),
            with_credentials: true,
            auth_token: None,
        }
    }

    /// Builder-style method to set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style method to add a default header
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    /// Builder-style method to set the bearer token
    #[must_use]
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Builder-style method to toggle cookie credentials
    #[must_use]
    pub fn with_credentials(mut self, enabled: bool) -> Self {
        self.with_credentials = enabled;
        self
    }

    /// Join a request path onto the base URL
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.base_url.is_empty() {
            return Err(ApiError::config("base_url cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ApiError::config("base_url must start with http:// or https://"));
        }

        reqwest::Url::parse(&self.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", self.base_url)))?;

        if self.timeout.is_zero() {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        Ok(())
    }
}

/// Primary and fallback endpoint configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointsConfig {
    /// Primary backend
    #[serde(default = "default_primary")]
    pub primary: ClientConfig,
    /// Backend tried when the primary cannot be reached
    #[serde(default = "default_fallback")]
    pub fallback: ClientConfig,
}

fn default_primary() -> ClientConfig {
    ClientConfig::new(DEFAULT_PRIMARY_URL)
}

fn default_fallback() -> ClientConfig {
    ClientConfig::new(DEFAULT_FALLBACK_URL)
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            primary: default_primary(),
            fallback: default_fallback(),
        }
    }
}

impl EndpointsConfig {
    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `ECOPULSE_API_URL` or `VITE_API_URL`: primary base URL
    /// - `ECOPULSE_FALLBACK_API_URL` or `VITE_RAILWAY_API_URL`: fallback base URL
    /// - `ECOPULSE_TIMEOUT_SECS`: request timeout in seconds (both clients)
    /// - `ECOPULSE_AUTH_TOKEN`: bearer token (both clients)
    pub fn from_env() -> ApiResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source
    pub fn from_lookup<F>(lookup: F) -> ApiResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let primary_url = resolve_base_url(&lookup, PRIMARY_URL_VARS, Some(DEFAULT_PRIMARY_URL))?;
        let fallback_url =
            resolve_base_url(&lookup, FALLBACK_URL_VARS, Some(DEFAULT_FALLBACK_URL))?;

        let timeout = match lookup(TIMEOUT_VAR) {
            Some(raw) => raw
                .trim()
                .parse()
                .map(Duration::from_secs)
                .map_err(|_| ApiError::config(format!("{TIMEOUT_VAR} must be whole seconds, got {raw:?}")))?,
            None => DEFAULT_TIMEOUT,
        };

        let auth_token = lookup(AUTH_TOKEN_VAR).filter(|t| !t.trim().is_empty());

        let build = |url: String| {
            let mut config = ClientConfig::new(url).with_timeout(timeout);
            config.auth_token.clone_from(&auth_token);
            config
        };

        let config = Self {
            primary: build(primary_url),
            fallback: build(fallback_url),
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> ApiResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| ApiError::config(format!("invalid TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> ApiResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ApiError::config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    /// Validate both endpoints
    pub fn validate(&self) -> ApiResult<()> {
        self.primary
            .validate()
            .map_err(|e| ApiError::config(format!("primary: {e}")))?;
        self.fallback
            .validate()
            .map_err(|e| ApiError::config(format!("fallback: {e}")))?;
        Ok(())
    }
}

/// Resolve a base URL from the first set variable in `vars`
///
/// Without a default, an unset URL is a hard error.
pub fn resolve_base_url<F>(lookup: &F, vars: &[&str], default: Option<&str>) -> ApiResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    vars.iter()
        .filter_map(|name| lookup(name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .or_else(|| default.map(str::to_string))
        .ok_or_else(|| ApiError::missing_env(vars.first().copied().unwrap_or("base URL")))
}
