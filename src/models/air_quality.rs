//! Normalised air-quality data.

use serde::Serialize;

use crate::models::SubRecord;

/// Maximum number of monitoring locations reported.
pub const MAX_LOCATIONS: usize = 5;

/// Search radius around the country's coordinates, in metres.
pub const SEARCH_RADIUS_M: u32 = 25_000;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    pub parameter: String,
    pub value: Option<f64>,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirQualityLocation {
    pub id: Option<String>,
    pub name: Option<String>,
    pub measurements: Vec<Measurement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirQualityReport {
    /// At most [`MAX_LOCATIONS`] entries
    pub results: Vec<AirQualityLocation>,
}

pub type AirQualityRecord = SubRecord<AirQualityReport>;
