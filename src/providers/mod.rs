//! Provider Adapters
//!
//! One adapter per upstream provider. Each builds its request URL, calls the
//! shared [`JsonFetcher`](crate::upstream::JsonFetcher) and decodes the
//! provider's JSON into a normalised sub-record.
//!
//! # Failure policy
//! - Country: failures propagate and abort the lookup
//! - Weather, exchange, air quality: failures become an error marker on
//!   the sub-record and never propagate

mod air_quality;
mod country;
mod exchange;
mod weather;

pub use air_quality::{decode_locations, AirQualityAdapter, MISSING_COORDINATES};
pub use country::{decode_countries, CountryAdapter};
pub use exchange::{decode_rates, ExchangeAdapter};
pub use weather::{decode_current, decode_forecast, WeatherAdapter, MISSING_WEATHER_INPUTS};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::UpstreamError;

/// Decodes a provider payload into its raw wire type.
fn decode<T: DeserializeOwned>(provider: &str, body: Value) -> Result<T, UpstreamError> {
    serde_json::from_value(body)
        .map_err(|e| UpstreamError::InvalidBody(format!("{provider} response: {e}")))
}

#[cfg(test)]
pub(crate) mod testing {
    //! Canned-response fetcher for adapter and aggregator tests.

    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::Value;
    use url::Url;

    use crate::error::UpstreamError;
    use crate::upstream::JsonFetcher;

    /// Answers by matching the request path suffix; unmatched paths get a 404.
    /// A later route for the same suffix overrides an earlier one.
    #[derive(Debug, Default)]
    pub struct FakeFetcher {
        routes: Vec<(String, Result<Value, UpstreamError>)>,
        calls: Mutex<Vec<Url>>,
        delay: Option<Duration>,
    }

    impl FakeFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn route(mut self, path_suffix: &str, response: Result<Value, UpstreamError>) -> Self {
            self.routes.push((path_suffix.to_string(), response));
            self
        }

        /// Every call sleeps for `delay` before answering.
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub fn calls(&self) -> Vec<Url> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl JsonFetcher for FakeFetcher {
        async fn get_json(&self, url: Url) -> Result<Value, UpstreamError> {
            self.calls.lock().unwrap().push(url.clone());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.routes
                .iter()
                .rev()
                .find(|(suffix, _)| url.path().ends_with(suffix.as_str()))
                .map(|(_, response)| response.clone())
                .unwrap_or_else(|| Err(UpstreamError::http(404, "Not Found", "")))
        }
    }
}
