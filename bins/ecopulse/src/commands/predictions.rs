//! Predictions command - renewable production forecasts

use super::{build_client, Outcome};
use crate::output::{format_count, print_json, Status};
use crate::OutputFormat;
use anyhow::{Context, Result};
use ecopulse_api_client::endpoints::{EnergySource, PredictionSeries};
use ecopulse_core::YearRange;
use ecopulse_telemetry::Timer;
use owo_colors::OwoColorize;
use std::path::Path;

/// Run predictions command
pub async fn run(
    source: &str,
    start: i32,
    end: i32,
    config_path: Option<&Path>,
    format: OutputFormat,
) -> Result<Outcome> {
    let source: EnergySource = source.parse()?;
    let range = YearRange::new(start, end).context("Invalid year range")?;
    let client = build_client(config_path)?;

    let timer = Timer::start("ecopulse_predictions_command_ms");
    let series = client.predictions().fetch(source, range).await;
    timer.stop();

    let series = match series {
        Ok(series) => series,
        Err(e) if format == OutputFormat::Json => {
            print_json(&serde_json::json!({"success": false, "message": e.user_message()}))?;
            return Ok(Outcome::Unsuccessful);
        }
        Err(e) => {
            Status::error(&format!("Failed to fetch {source} predictions: {}", e.user_message()));
            return Ok(Outcome::Unsuccessful);
        }
    };

    if format == OutputFormat::Json {
        print_json(&series)?;
    } else {
        print_series(&series, range);
    }
    Ok(Outcome::Success)
}

fn print_series(series: &PredictionSeries, range: YearRange) {
    Status::header(&format!("{} predictions {range}", capitalize(series.source.as_str())));
    println!(
        "  {:<6} {:>14} {:>16} {:>12}",
        "Year".dimmed(),
        "Production".dimmed(),
        "Non-renewable".dimmed(),
        "Population".dimmed()
    );

    let mut points: Vec<_> = series.points.iter().filter(|p| !p.is_deleted).collect();
    points.sort_by_key(|p| p.year);
    for point in &points {
        let marker = if point.is_predicted { "*" } else { " " };
        println!(
            "  {:<6} {:>13.2}{} {:>16} {:>12}",
            point.year,
            point.value,
            marker.cyan(),
            optional(point.non_renewable_energy),
            optional(point.population)
        );
    }
    println!();

    if let Some(projection) = series.current_projection() {
        Status::info(&format!("Current projection: {projection:.2} GWh"));
    }
    Status::info(&format!(
        "{} ({} predicted)",
        format_count(points.len(), "year", "years"),
        series.predicted().count()
    ));
}

fn optional(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
