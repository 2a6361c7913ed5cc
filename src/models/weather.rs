//! Normalised weather data.

use serde::Serialize;

use crate::models::SubRecord;

/// Number of 3-hourly forecast samples kept (~24 hours).
pub const FORECAST_SAMPLES: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    /// Degrees Celsius
    pub temp: f64,
    /// Percent
    pub humidity: Option<f64>,
    /// hPa
    pub pressure: Option<f64>,
    /// Metres per second
    pub wind_speed: Option<f64>,
    pub description: Option<String>,
    pub icon: Option<String>,
    /// Shift from UTC in seconds
    pub timezone: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSample {
    /// Unix seconds
    pub dt: i64,
    pub temp: f64,
    pub description: Option<String>,
    pub wind_speed: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub current: CurrentConditions,
    /// At most [`FORECAST_SAMPLES`] entries
    pub forecast: Vec<ForecastSample>,
}

pub type WeatherRecord = SubRecord<WeatherReport>;
