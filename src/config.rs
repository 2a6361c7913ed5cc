//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;

pub const DEFAULT_COUNTRIES_API_URL: &str = "https://restcountries.com/v3.1";
pub const DEFAULT_WEATHER_API_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_EXCHANGE_API_URL: &str = "https://api.exchangerate.host";
pub const DEFAULT_AIR_QUALITY_API_URL: &str = "https://api.openaq.org/v2";

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// OpenWeatherMap API key; weather is reported as unavailable without it
    pub weather_api_key: Option<String>,
    /// OpenAQ API key, sent as a header on air-quality requests
    pub air_quality_api_key: Option<String>,
    /// TTL in seconds for cached composite records
    pub cache_ttl: u64,
    /// Maximum number of composite records kept in memory
    pub max_entries: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Provider base URLs
    pub endpoints: ProviderEndpoints,
}

/// Base URLs of the four upstream providers, without trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEndpoints {
    pub countries: String,
    pub weather: String,
    pub exchange: String,
    pub air_quality: String,
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            countries: DEFAULT_COUNTRIES_API_URL.to_string(),
            weather: DEFAULT_WEATHER_API_URL.to_string(),
            exchange: DEFAULT_EXCHANGE_API_URL.to_string(),
            air_quality: DEFAULT_AIR_QUALITY_API_URL.to_string(),
        }
    }
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `OPENWEATHER_API_KEY` - Weather provider key (default: unset)
    /// - `OPENAQ_API_KEY` - Air-quality provider key (default: unset)
    /// - `CACHE_TTL_SECONDS` - Cache TTL in seconds (default: 300)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 60)
    /// - `COUNTRIES_API_URL`, `WEATHER_API_URL`, `EXCHANGE_API_URL`,
    ///   `AIR_QUALITY_API_URL` - Provider base URLs
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            weather_api_key: secret_var("OPENWEATHER_API_KEY"),
            air_quality_api_key: secret_var("OPENAQ_API_KEY"),
            cache_ttl: parsed_var("CACHE_TTL_SECONDS").unwrap_or(defaults.cache_ttl),
            max_entries: parsed_var("CACHE_MAX_ENTRIES").unwrap_or(defaults.max_entries),
            server_port: parsed_var("PORT").unwrap_or(defaults.server_port),
            cleanup_interval: parsed_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            endpoints: ProviderEndpoints {
                countries: url_var("COUNTRIES_API_URL", DEFAULT_COUNTRIES_API_URL),
                weather: url_var("WEATHER_API_URL", DEFAULT_WEATHER_API_URL),
                exchange: url_var("EXCHANGE_API_URL", DEFAULT_EXCHANGE_API_URL),
                air_quality: url_var("AIR_QUALITY_API_URL", DEFAULT_AIR_QUALITY_API_URL),
            },
        }
    }

    /// Names of provider API keys that are not configured.
    pub fn missing_api_keys(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.weather_api_key.is_none() {
            missing.push("OPENWEATHER_API_KEY");
        }
        if self.air_quality_api_key.is_none() {
            missing.push("OPENAQ_API_KEY");
        }
        missing
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            weather_api_key: None,
            air_quality_api_key: None,
            cache_ttl: 300,
            max_entries: 1000,
            server_port: 3000,
            cleanup_interval: 60,
            endpoints: ProviderEndpoints::default(),
        }
    }
}

fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

// Blank keys are treated the same as missing ones
fn secret_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn url_var(name: &str, default: &str) -> String {
    secret_var(name)
        .unwrap_or_else(|| default.to_string())
        .trim_end_matches('/')
        .to_string()
}
