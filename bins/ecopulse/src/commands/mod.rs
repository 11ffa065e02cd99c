//! CLI command implementations

pub mod config;
pub mod predictions;
pub mod tickets;

use anyhow::{Context, Result};
use ecopulse_api_client::config::AUTH_TOKEN_VAR;
use ecopulse_api_client::{ApiError, EcoPulseClient, EndpointsConfig};
use ecopulse_core::error::exit_codes;
use std::path::Path;

/// Whether the backend reported success
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Unsuccessful,
}

impl From<bool> for Outcome {
    fn from(success: bool) -> Self {
        if success {
            Self::Success
        } else {
            Self::Unsuccessful
        }
    }
}

impl Outcome {
    /// Process exit code for this outcome
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Success => exit_codes::SUCCESS,
            Self::Unsuccessful => exit_codes::FAILURE,
        }
    }
}

/// Process exit code for a command that failed with `err`
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    if let Some(err) = err.downcast_ref::<ecopulse_core::Error>() {
        return err.code.exit_code();
    }
    match err.downcast_ref::<ApiError>() {
        Some(ApiError::Config(_) | ApiError::MissingEnvVar(_) | ApiError::InvalidUrl(_)) => {
            exit_codes::CONFIG_ERROR
        }
        Some(ApiError::Validation(_)) => exit_codes::VALIDATION_ERROR,
        Some(ApiError::Network { .. }) => exit_codes::NETWORK_ERROR,
        _ => exit_codes::FAILURE,
    }
}

/// Resolve endpoints from `--config` or the environment
///
/// A TOML file never stores the token; `ECOPULSE_AUTH_TOKEN` still applies.
pub fn load_endpoints(config_path: Option<&Path>) -> Result<EndpointsConfig> {
    let Some(path) = config_path else {
        return EndpointsConfig::from_env().context("Failed to load endpoints from environment");
    };

    let mut config = EndpointsConfig::from_toml_file(path)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    if let Some(token) = std::env::var(AUTH_TOKEN_VAR).ok().filter(|t| !t.trim().is_empty()) {
        config.primary.auth_token = Some(token.clone());
        config.fallback.auth_token = Some(token);
    }
    Ok(config)
}

/// Build the dual-endpoint client
pub fn build_client(config_path: Option<&Path>) -> Result<EcoPulseClient> {
    let config = load_endpoints(config_path)?;
    tracing::debug!(
        primary = %config.primary.base_url,
        fallback = %config.fallback.base_url,
        "Building API client"
    );
    EcoPulseClient::with_config(&config).context("Failed to build API client")
}
