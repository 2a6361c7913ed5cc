//! Normalised exchange rates.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::SubRecord;

/// Currencies every exchange lookup is quoted against.
pub const TARGET_CURRENCIES: [&str; 3] = ["USD", "EUR", "GBP"];

/// Base currency used when the country lists none.
pub const FALLBACK_BASE_CURRENCY: &str = "USD";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeRates {
    pub base: String,
    pub rates: BTreeMap<String, f64>,
    /// As-of date reported by the provider
    pub date: Option<String>,
}

pub type ExchangeRecord = SubRecord<ExchangeRates>;
