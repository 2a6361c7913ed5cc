//! Aggregator
//!
//! Resolves the country first, then fans out to the three secondary
//! providers concurrently and combines everything into one record.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::models::{CompositeRecord, CountryKey};
use crate::providers::{AirQualityAdapter, CountryAdapter, ExchangeAdapter, WeatherAdapter};
use crate::upstream::JsonFetcher;

/// Owns the four provider adapters. Cheap to clone.
#[derive(Clone)]
pub struct Aggregator {
    country: CountryAdapter,
    weather: WeatherAdapter,
    exchange: ExchangeAdapter,
    air_quality: AirQualityAdapter,
}

impl Aggregator {
    /// Wires all adapters to `fetcher` using the configured provider URLs.
    pub fn new(fetcher: Arc<dyn JsonFetcher>, config: &Config) -> Self {
        let endpoints = &config.endpoints;
        Self {
            country: CountryAdapter::new(fetcher.clone(), endpoints.countries.as_str()),
            weather: WeatherAdapter::new(
                fetcher.clone(),
                endpoints.weather.as_str(),
                config.weather_api_key.clone(),
            ),
            exchange: ExchangeAdapter::new(fetcher.clone(), endpoints.exchange.as_str()),
            air_quality: AirQualityAdapter::new(fetcher, endpoints.air_quality.as_str()),
        }
    }

    /// Builds the composite record for `key`.
    ///
    /// Only country resolution can fail; the secondary providers report
    /// their failures inside the record.
    pub async fn aggregate(&self, key: &CountryKey) -> Result<CompositeRecord> {
        let country = self.country.resolve(key).await?;

        let (weather, exchange, air_quality) = tokio::join!(
            self.weather.fetch(country.coordinates),
            self.exchange.fetch(&country.currencies),
            self.air_quality.fetch(country.coordinates),
        );

        info!(
            "Aggregated '{}': weather={} exchange={} air_quality={}",
            key,
            status(weather.is_failed()),
            status(exchange.is_failed()),
            status(air_quality.is_failed()),
        );

        Ok(CompositeRecord {
            country,
            weather,
            exchange,
            air_quality,
            fetched_at: Utc::now(),
        })
    }
}

fn status(failed: bool) -> &'static str {
    if failed {
        "error"
    } else {
        "ok"
    }
}
