//! The combined record served per country.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{AirQualityRecord, CountryRecord, ExchangeRecord, WeatherRecord};

/// Result of all four provider lookups for one country.
///
/// Built once per cache miss and never modified afterwards; the cache
/// shares it behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeRecord {
    pub country: CountryRecord,
    pub weather: WeatherRecord,
    pub exchange: ExchangeRecord,
    pub air_quality: AirQualityRecord,
    pub fetched_at: DateTime<Utc>,
}
