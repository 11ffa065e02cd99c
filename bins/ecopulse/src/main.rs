//! EcoPulse CLI - support desk and energy prediction tooling
//!
//! Talks to the primary EcoPulse backend and falls back to the secondary
//! deployment whenever the primary cannot be reached.

use clap::{Parser, Subcommand, ValueEnum};
use ecopulse_telemetry::{LogFormat, TelemetryConfig};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod output;

use commands::{config, predictions, tickets};

/// Operator CLI for the EcoPulse backends
#[derive(Parser)]
#[command(name = "ecopulse")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// TOML file with `[primary]` and `[fallback]` endpoint sections
    #[arg(short, long, global = true, env = "ECOPULSE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// How results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage support tickets
    Tickets {
        #[command(subcommand)]
        action: tickets::TicketAction,
    },

    /// Show renewable production predictions
    Predictions {
        /// Energy source (solar, hydro, wind, biomass, geothermal)
        source: String,

        /// First year of the range
        #[arg(long, default_value_t = ecopulse_core::year_range::DEFAULT_START_YEAR)]
        start: i32,

        /// Last year of the range
        #[arg(long, default_value_t = ecopulse_core::year_range::DEFAULT_END_YEAR)]
        end: i32,
    },

    /// Print the resolved endpoint configuration
    Config,
}

fn telemetry_config(cli: &Cli) -> TelemetryConfig {
    let config = if cli.verbose {
        TelemetryConfig::verbose()
    } else {
        TelemetryConfig::default()
    };
    match cli.format {
        OutputFormat::Json => config.with_format(LogFormat::Json),
        OutputFormat::Text => config,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = ecopulse_telemetry::init_with_config(telemetry_config(&cli)) {
        eprintln!("{} {}", "Warning:".yellow().bold(), e);
    }

    let config_path = cli.config.as_deref();
    let result = match cli.command {
        Commands::Tickets { action } => tickets::run(action, config_path, cli.format).await,
        Commands::Predictions { source, start, end } => {
            predictions::run(&source, start, end, config_path, cli.format).await
        }
        Commands::Config => config::run(config_path, cli.format),
    };

    match result {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::from(commands::exit_code_for(&e))
        }
    }
}
