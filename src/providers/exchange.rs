//! Exchange-rate adapter (exchangerate.host `latest`).

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::error::UpstreamError;
use crate::models::exchange::{FALLBACK_BASE_CURRENCY, TARGET_CURRENCIES};
use crate::models::{CurrencyMap, ExchangeRates, ExchangeRecord, SubRecord};
use crate::providers::decode;
use crate::upstream::{endpoint, JsonFetcher};

#[derive(Debug, Deserialize)]
struct RawRates {
    base: Option<String>,
    date: Option<String>,
    rates: Option<BTreeMap<String, Option<f64>>>,
}

/// Decodes a `latest` payload. A body without `rates` is a failure.
pub fn decode_rates(body: Value, requested_base: &str) -> Result<ExchangeRates, UpstreamError> {
    let raw: RawRates = decode("exchange", body)?;
    let rates = raw
        .rates
        .ok_or_else(|| UpstreamError::InvalidBody("exchange response has no rates".to_string()))?;

    Ok(ExchangeRates {
        base: raw.base.unwrap_or_else(|| requested_base.to_string()),
        rates: rates
            .into_iter()
            .filter_map(|(code, rate)| rate.map(|rate| (code, rate)))
            .collect(),
        date: raw.date,
    })
}

// == Exchange Adapter ==
#[derive(Clone)]
pub struct ExchangeAdapter {
    fetcher: Arc<dyn JsonFetcher>,
    base_url: String,
}

impl ExchangeAdapter {
    pub fn new(fetcher: Arc<dyn JsonFetcher>, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
        }
    }

    /// Rates from the country's primary currency into USD, EUR and GBP.
    ///
    /// Countries without currencies are quoted from USD. Never fails.
    pub async fn fetch(&self, currencies: &CurrencyMap) -> ExchangeRecord {
        let base = currencies.primary_code().unwrap_or(FALLBACK_BASE_CURRENCY);

        match self.try_fetch(base).await {
            Ok(rates) => SubRecord::Ready(rates),
            Err(err) => {
                warn!("Exchange lookup for {} failed: {}", base, err);
                SubRecord::failed(err.to_string())
            }
        }
    }

    async fn try_fetch(&self, base: &str) -> Result<ExchangeRates, UpstreamError> {
        let symbols = TARGET_CURRENCIES.join(",");
        let url = endpoint(
            &self.base_url,
            &["latest"],
            &[("base", base), ("symbols", symbols.as_str())],
        )?;

        decode_rates(self.fetcher.get_json(url).await?, base)
    }
}
