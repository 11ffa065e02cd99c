//! Energy production prediction endpoints
//!
//! `GET /predictions/<source>/?start_year=&end_year=` returns rows mixing
//! historical and predicted years. Rows are loosely typed: numeric columns
//! arrive as numbers, numeric strings, `null`, or are missing entirely.

use crate::client::EcoPulseClient;
use crate::error::{ApiError, ApiResult};
use crate::request::RequestDescriptor;
use crate::transport::{HttpClient, Transport};
use ecopulse_core::YearRange;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, error};

/// Message for responses that are not a prediction payload
pub const INVALID_FORMAT_MESSAGE: &str = "Invalid data format in API response";

/// Renewable sources with a prediction model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergySource {
    Solar,
    Hydro,
    Wind,
    Biomass,
    Geothermal,
}

impl EnergySource {
    /// Every source, in display order
    pub const ALL: [Self; 5] = [
        Self::Solar,
        Self::Hydro,
        Self::Wind,
        Self::Biomass,
        Self::Geothermal,
    ];

    /// Path segment used by the backend
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Solar => "solar",
            Self::Hydro => "hydro",
            Self::Wind => "wind",
            Self::Biomass => "biomass",
            Self::Geothermal => "geothermal",
        }
    }

    fn path(self) -> String {
        format!("/predictions/{}/", self.as_str())
    }
}

impl fmt::Display for EnergySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnergySource {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|source| source.as_str() == wanted)
            .ok_or_else(|| ApiError::validation(format!("unknown energy source {s:?}")))
    }
}

/// One year of a prediction series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionPoint {
    pub year: i32,
    /// Production in GWh
    pub value: f64,
    pub non_renewable_energy: Option<f64>,
    pub population: Option<f64>,
    pub gdp: Option<f64>,
    pub is_predicted: bool,
    pub is_deleted: bool,
}

impl PredictionPoint {
    /// Build a point from a raw backend row
    ///
    /// Historical columns are dropped for predicted rows.
    pub fn from_row(row: &Map<String, Value>) -> ApiResult<Self> {
        #[allow(clippy::cast_possible_truncation)]
        let year = row
            .get("Year")
            .and_then(number)
            .ok_or_else(|| ApiError::validation(INVALID_FORMAT_MESSAGE))? as i32;
        let is_predicted = row.get("isPredicted").and_then(Value::as_bool).unwrap_or(false);
        let historical = |key: &str| {
            if is_predicted {
                None
            } else {
                row.get(key).and_then(number)
            }
        };

        Ok(Self {
            year,
            value: row.get("Predicted Production").and_then(number).unwrap_or(0.0),
            non_renewable_energy: historical("Non-Renewable Energy (GWh)"),
            population: historical("Population (in millions)"),
            gdp: historical("Gross Domestic Product"),
            is_predicted,
            is_deleted: row.get("isDeleted").and_then(Value::as_bool).unwrap_or(false),
        })
    }
}

/// Numbers may arrive as JSON numbers or numeric strings
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Predictions for one source over a year range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionSeries {
    pub source: EnergySource,
    pub range: (i32, i32),
    pub points: Vec<PredictionPoint>,
}

impl PredictionSeries {
    /// Production at the latest year in the series
    #[must_use]
    pub fn current_projection(&self) -> Option<f64> {
        self.points
            .iter()
            .max_by_key(|point| point.year)
            .map(|point| point.value)
    }

    /// Rows produced by the model rather than recorded
    pub fn predicted(&self) -> impl Iterator<Item = &PredictionPoint> {
        self.points.iter().filter(|point| point.is_predicted)
    }

    /// Recorded rows
    pub fn historical(&self) -> impl Iterator<Item = &PredictionPoint> {
        self.points.iter().filter(|point| !point.is_predicted)
    }
}

/// Parse a `{status: "success", predictions: [...]}` payload
pub fn parse_predictions(
    source: EnergySource,
    range: YearRange,
    body: Option<&Value>,
) -> ApiResult<PredictionSeries> {
    let invalid = || ApiError::validation(INVALID_FORMAT_MESSAGE);
    let body = body.ok_or_else(invalid)?;

    if body.get("status").and_then(Value::as_str) != Some("success") {
        return Err(invalid());
    }
    let rows = body
        .get("predictions")
        .and_then(Value::as_array)
        .ok_or_else(invalid)?;

    let points = rows
        .iter()
        .map(|row| row.as_object().ok_or_else(invalid).and_then(PredictionPoint::from_row))
        .collect::<ApiResult<Vec<_>>>()?;

    Ok(PredictionSeries {
        source,
        range: (range.start(), range.end()),
        points,
    })
}

/// Predictions API interface
#[derive(Clone)]
pub struct PredictionsApi<T = HttpClient> {
    client: EcoPulseClient<T>,
}

impl<T: Transport> PredictionsApi<T> {
    /// Create a new predictions API interface
    pub(crate) fn new(client: EcoPulseClient<T>) -> Self {
        Self { client }
    }

    /// Fetch predictions for `source` over `range`
    pub async fn fetch(&self, source: EnergySource, range: YearRange) -> ApiResult<PredictionSeries> {
        debug!(%source, %range, "Fetching predictions");
        let request = RequestDescriptor::get(source.path()).with_params([
            ("start_year", range.start().to_string()),
            ("end_year", range.end().to_string()),
        ]);

        let response = self.client.send(&request).await?;
        parse_predictions(source, range, response.body()).inspect_err(|_| {
            error!(%source, "Invalid prediction response format");
        })
    }
}
