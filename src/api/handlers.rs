//! API Handlers
//!
//! HTTP request handlers for each service endpoint.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tokio::sync::RwLock;

use crate::aggregator::Aggregator;
use crate::cache::CacheStore;
use crate::config::Config;
use crate::error::{AppError, Result, UpstreamError};
use crate::models::{CountryInfoResponse, ErrorResponse, HealthResponse, StatsResponse};
use crate::service::{CountryInfoService, RecordCache};
use crate::upstream::{JsonFetcher, UpstreamClient};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: CountryInfoService,
    started_at: Instant,
}

impl AppState {
    /// Creates a new AppState around an already wired service.
    pub fn new(service: CountryInfoService) -> Self {
        Self {
            service,
            started_at: Instant::now(),
        }
    }

    /// Wires the cache and aggregator from configuration, fetching through
    /// `fetcher`.
    pub fn with_fetcher(config: &Config, fetcher: Arc<dyn JsonFetcher>) -> Self {
        let cache = Arc::new(RwLock::new(CacheStore::new(
            config.max_entries,
            Duration::from_secs(config.cache_ttl),
        )));
        Self::new(CountryInfoService::new(
            cache,
            Aggregator::new(fetcher, config),
        ))
    }

    /// Production wiring: real HTTP client against the configured providers.
    pub fn from_config(config: &Config) -> std::result::Result<Self, UpstreamError> {
        let client = UpstreamClient::from_config(config)?;
        Ok(Self::with_fetcher(config, Arc::new(client)))
    }

    pub fn cache(&self) -> &RecordCache {
        self.service.cache()
    }
}

/// Handler for GET /country-info/:name
pub async fn country_info_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<CountryInfoResponse>> {
    let lookup = state.service.lookup(&name).await?;
    Ok(Json(CountryInfoResponse::new(lookup.record, lookup.from_cache)))
}

/// Handler for GET /country-info/ with no name segment
pub async fn missing_name_handler() -> AppError {
    AppError::Validation("Country name must not be empty".to_string())
}

/// Handler for GET /health-check
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::ok(state.started_at.elapsed().as_secs_f64()))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache().read().await;
    Json(StatsResponse::new(&cache.stats(), cache.ttl().as_secs()))
}

/// Fallback for unknown routes
pub async fn not_found_handler() -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new("Not found")))
}
