//! Weather adapter (OpenWeatherMap current conditions + 5 day / 3 hour forecast).

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::error::UpstreamError;
use crate::models::weather::FORECAST_SAMPLES;
use crate::models::{
    Coordinates, CurrentConditions, ForecastSample, SubRecord, WeatherRecord, WeatherReport,
};
use crate::providers::decode;
use crate::upstream::{endpoint, JsonFetcher};

/// Error marker used when the adapter cannot even try.
pub const MISSING_WEATHER_INPUTS: &str = "No lat/lon or API key not set";

// == Wire Types ==
#[derive(Debug, Deserialize)]
struct RawMain {
    temp: f64,
    humidity: Option<f64>,
    pressure: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawWind {
    speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawCondition {
    description: Option<String>,
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCurrent {
    main: RawMain,
    wind: Option<RawWind>,
    #[serde(default)]
    weather: Vec<RawCondition>,
    timezone: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawForecast {
    list: Vec<RawForecastItem>,
}

#[derive(Debug, Deserialize)]
struct RawForecastItem {
    dt: i64,
    main: RawMain,
    wind: Option<RawWind>,
    #[serde(default)]
    weather: Vec<RawCondition>,
}

/// Decodes the current-conditions payload. `main.temp` is mandatory.
pub fn decode_current(body: Value) -> Result<CurrentConditions, UpstreamError> {
    let raw: RawCurrent = decode("weather", body)?;
    let condition = raw.weather.into_iter().next();

    Ok(CurrentConditions {
        temp: raw.main.temp,
        humidity: raw.main.humidity,
        pressure: raw.main.pressure,
        wind_speed: raw.wind.and_then(|w| w.speed),
        description: condition.as_ref().and_then(|c| c.description.clone()),
        icon: condition.and_then(|c| c.icon),
        timezone: raw.timezone,
    })
}

/// Decodes the forecast payload, keeping the first [`FORECAST_SAMPLES`] entries.
pub fn decode_forecast(body: Value) -> Result<Vec<ForecastSample>, UpstreamError> {
    let raw: RawForecast = decode("forecast", body)?;

    Ok(raw
        .list
        .into_iter()
        .take(FORECAST_SAMPLES)
        .map(|item| ForecastSample {
            dt: item.dt,
            temp: item.main.temp,
            description: item.weather.into_iter().next().and_then(|c| c.description),
            wind_speed: item.wind.and_then(|w| w.speed),
        })
        .collect())
}

// == Weather Adapter ==
#[derive(Clone)]
pub struct WeatherAdapter {
    fetcher: Arc<dyn JsonFetcher>,
    base_url: String,
    api_key: Option<String>,
}

impl WeatherAdapter {
    pub fn new(
        fetcher: Arc<dyn JsonFetcher>,
        base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
            api_key,
        }
    }

    /// Current conditions plus the next ~24h of forecast for `coordinates`.
    ///
    /// Never fails: missing inputs or any upstream problem yield an error
    /// marker instead.
    pub async fn fetch(&self, coordinates: Option<Coordinates>) -> WeatherRecord {
        let (Some(coordinates), Some(api_key)) = (coordinates, self.api_key.as_deref()) else {
            return SubRecord::failed(MISSING_WEATHER_INPUTS);
        };

        match self.try_fetch(coordinates, api_key).await {
            Ok(report) => SubRecord::Ready(report),
            Err(err) => {
                warn!("Weather lookup failed: {}", err);
                SubRecord::failed(err.to_string())
            }
        }
    }

    async fn try_fetch(
        &self,
        coordinates: Coordinates,
        api_key: &str,
    ) -> Result<WeatherReport, UpstreamError> {
        let lat = coordinates.lat.to_string();
        let lon = coordinates.lon.to_string();
        let query = [
            ("lat", lat.as_str()),
            ("lon", lon.as_str()),
            ("units", "metric"),
            ("appid", api_key),
        ];

        let current_url = endpoint(&self.base_url, &["weather"], &query)?;
        let forecast_url = endpoint(&self.base_url, &["forecast"], &query)?;

        let (current, forecast) = tokio::try_join!(
            self.fetcher.get_json(current_url),
            self.fetcher.get_json(forecast_url)
        )?;

        Ok(WeatherReport {
            current: decode_current(current)?,
            forecast: decode_forecast(forecast)?,
        })
    }
}
