//! Data model for the country information service
//!
//! Normalised sub-records produced by the provider adapters, the composite
//! record built from them, and the DTOs serialised at the HTTP boundary.

pub mod air_quality;
pub mod composite;
pub mod country;
pub mod exchange;
pub mod key;
pub mod responses;
pub mod sub_record;
pub mod weather;

// Re-export commonly used types
pub use air_quality::{AirQualityLocation, AirQualityRecord, AirQualityReport, Measurement};
pub use composite::CompositeRecord;
pub use country::{Coordinates, CountryRecord, Currency, CurrencyMap, Flags};
pub use exchange::{ExchangeRates, ExchangeRecord};
pub use key::CountryKey;
pub use responses::{CountryInfoResponse, ErrorResponse, HealthResponse, StatsResponse};
pub use sub_record::{ErrorMarker, SubRecord};
pub use weather::{CurrentConditions, ForecastSample, WeatherRecord, WeatherReport};
