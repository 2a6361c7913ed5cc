//! Response DTOs for the HTTP API
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::sync::Arc;

use serde::Serialize;

use crate::cache::CacheStats;
use crate::models::CompositeRecord;

/// Response body for GET /country-info/:name
///
/// The composite record's fields are inlined next to `fromCache`. The
/// flag lives only here, never in the cached value.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryInfoResponse {
    pub from_cache: bool,
    #[serde(flatten)]
    pub record: Arc<CompositeRecord>,
}

impl CountryInfoResponse {
    pub fn new(record: Arc<CompositeRecord>, from_cache: bool) -> Self {
        Self { from_cache, record }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub total_entries: usize,
    /// hits / (hits + misses)
    pub hit_rate: f64,
    pub ttl_seconds: u64,
}

impl StatsResponse {
    pub fn new(stats: &CacheStats, ttl_seconds: u64) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
            hit_rate: stats.hit_rate(),
            ttl_seconds,
        }
    }
}

/// Response body for the health endpoint (GET /health-check)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// Seconds since the process started serving
    pub uptime: f64,
}

impl HealthResponse {
    pub fn ok(uptime: f64) -> Self {
        Self {
            status: "ok".to_string(),
            uptime,
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AirQualityReport, CountryRecord, CurrencyMap, ExchangeRecord, Flags, SubRecord,
    };
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn sample_record() -> CompositeRecord {
        CompositeRecord {
            country: CountryRecord {
                name: Some("France".to_string()),
                official_name: Some("French Republic".to_string()),
                capital: Some("Paris".to_string()),
                population: Some(67_391_582),
                region: Some("Europe".to_string()),
                subregion: Some("Western Europe".to_string()),
                flags: Flags::default(),
                coordinates: None,
                currencies: CurrencyMap::default(),
            },
            weather: SubRecord::failed("No lat/lon or API key not set"),
            exchange: ExchangeRecord::failed("Upstream returned 500"),
            air_quality: SubRecord::Ready(AirQualityReport { results: vec![] }),
            fetched_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_country_info_response_shape() {
        let resp = CountryInfoResponse::new(Arc::new(sample_record()), true);
        let value = serde_json::to_value(&resp).unwrap();

        assert_eq!(value["fromCache"], json!(true));
        assert_eq!(value["country"]["name"], json!("France"));
        assert_eq!(value["country"]["officialName"], json!("French Republic"));
        assert_eq!(value["weather"]["error"], json!("No lat/lon or API key not set"));
        assert_eq!(value["airQuality"]["results"], json!([]));
        assert_eq!(value["fetchedAt"], json!("2024-05-01T12:00:00Z"));
    }

    #[test]
    fn test_stats_response_from_stats() {
        let stats = CacheStats {
            hits: 8,
            misses: 2,
            evictions: 1,
            expirations: 3,
            total_entries: 4,
        };
        let resp = StatsResponse::new(&stats, 300);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
        assert_eq!(resp.ttl_seconds, 300);

        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["totalEntries"], json!(4));
    }

    #[test]
    fn test_health_response_serialize() {
        let value = serde_json::to_value(HealthResponse::ok(12.5)).unwrap();
        assert_eq!(value, json!({"status": "ok", "uptime": 12.5}));
    }

    #[test]
    fn test_error_response_serialize() {
        let json = serde_json::to_string(&ErrorResponse::new("Something went wrong")).unwrap();
        assert_eq!(json, r#"{"error":"Something went wrong"}"#);
    }
}
