//! Config command - show the resolved endpoints

use super::{load_endpoints, Outcome};
use crate::output::{print_json, Status};
use crate::OutputFormat;
use anyhow::Result;
use ecopulse_api_client::ClientConfig;
use owo_colors::OwoColorize;
use serde_json::json;
use std::path::Path;

/// Run config command
pub fn run(config_path: Option<&Path>, format: OutputFormat) -> Result<Outcome> {
    let config = load_endpoints(config_path)?;
    let source = config_path.map_or_else(|| "environment".to_string(), |p| p.display().to_string());

    if format == OutputFormat::Json {
        print_json(&json!({
            "source": source,
            "primary": config.primary,
            "fallback": config.fallback,
            "authenticated": config.primary.auth_token.is_some(),
        }))?;
        return Ok(Outcome::Success);
    }

    Status::header("EcoPulse endpoints");
    print_endpoint("Primary", &config.primary);
    print_endpoint("Fallback", &config.fallback);
    println!();
    Status::info(&format!("Loaded from {source}"));
    if config.primary.auth_token.is_none() {
        Status::warning("No bearer token configured; authenticated endpoints will be rejected");
    }
    Ok(Outcome::Success)
}

fn print_endpoint(label: &str, config: &ClientConfig) {
    println!(
        "  {:<9} {}  {}",
        label.dimmed(),
        config.base_url.cyan(),
        format!("(timeout {}s)", config.timeout.as_secs()).dimmed()
    );
}
