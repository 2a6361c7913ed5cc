//! Country Info - aggregated country information service
//!
//! Combines country metadata, weather, exchange rates and air quality from
//! four public providers into one record per country, cached for a fixed TTL.
//! A failing weather, exchange or air-quality provider only marks its own
//! part of the record as failed.

pub mod aggregator;
pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod providers;
pub mod service;
pub mod tasks;
pub mod upstream;

pub use api::{create_router, AppState};
pub use config::Config;
pub use error::{AppError, UpstreamError};
pub use service::CountryInfoService;
pub use tasks::spawn_cleanup_task;
