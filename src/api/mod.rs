//! API Module
//!
//! HTTP handlers and routing for the country information service.
//!
//! # Endpoints
//! - `GET /country-info/:name` - Composite record for a country
//! - `GET /health-check` - Liveness and uptime
//! - `GET /stats` - Cache statistics

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
