//! Air-quality adapter (OpenAQ nearby locations).
//!
//! The API key is not handled here: the upstream client attaches it to every
//! request under the air-quality base URL.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::error::UpstreamError;
use crate::models::air_quality::{MAX_LOCATIONS, SEARCH_RADIUS_M};
use crate::models::{
    AirQualityLocation, AirQualityRecord, AirQualityReport, Coordinates, Measurement, SubRecord,
};
use crate::providers::decode;
use crate::upstream::{endpoint, JsonFetcher};

pub const MISSING_COORDINATES: &str = "No lat/lon available";

#[derive(Debug, Deserialize)]
struct RawLocations {
    results: Vec<RawLocation>,
}

#[derive(Debug, Deserialize)]
struct RawLocation {
    id: Option<Value>,
    name: Option<String>,
    #[serde(default, alias = "measurements")]
    parameters: Vec<RawParameter>,
}

#[derive(Debug, Deserialize)]
struct RawParameter {
    parameter: Option<String>,
    #[serde(alias = "lastValue")]
    value: Option<f64>,
    unit: Option<String>,
}

// Location ids come back as numbers or strings depending on API version
fn id_to_string(id: Value) -> Option<String> {
    match id {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Decodes a locations payload, keeping at most [`MAX_LOCATIONS`] entries.
pub fn decode_locations(body: Value) -> Result<AirQualityReport, UpstreamError> {
    let raw: RawLocations = decode("air quality", body)?;

    let results = raw
        .results
        .into_iter()
        .take(MAX_LOCATIONS)
        .map(|location| AirQualityLocation {
            id: location.id.and_then(id_to_string),
            name: location.name,
            measurements: location
                .parameters
                .into_iter()
                .filter_map(|p| {
                    Some(Measurement {
                        parameter: p.parameter?,
                        value: p.value,
                        unit: p.unit,
                    })
                })
                .collect(),
        })
        .collect();

    Ok(AirQualityReport { results })
}

// == Air Quality Adapter ==
#[derive(Clone)]
pub struct AirQualityAdapter {
    fetcher: Arc<dyn JsonFetcher>,
    base_url: String,
}

impl AirQualityAdapter {
    pub fn new(fetcher: Arc<dyn JsonFetcher>, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
        }
    }

    /// Monitoring locations within 25 km of `coordinates`. Never fails.
    pub async fn fetch(&self, coordinates: Option<Coordinates>) -> AirQualityRecord {
        let Some(coordinates) = coordinates else {
            return SubRecord::failed(MISSING_COORDINATES);
        };

        match self.try_fetch(coordinates).await {
            Ok(report) => SubRecord::Ready(report),
            Err(err) => {
                warn!("Air quality lookup failed: {}", err);
                SubRecord::failed(err.to_string())
            }
        }
    }

    async fn try_fetch(&self, coordinates: Coordinates) -> Result<AirQualityReport, UpstreamError> {
        let point = format!("{},{}", coordinates.lat, coordinates.lon);
        let radius = SEARCH_RADIUS_M.to_string();
        let limit = MAX_LOCATIONS.to_string();
        let url = endpoint(
            &self.base_url,
            &["locations"],
            &[
                ("coordinates", point.as_str()),
                ("radius", radius.as_str()),
                ("limit", limit.as_str()),
            ],
        )?;

        decode_locations(self.fetcher.get_json(url).await?)
    }
}
