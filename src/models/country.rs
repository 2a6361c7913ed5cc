//! Normalised country metadata.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Flag image references.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Flags {
    pub png: Option<String>,
    pub svg: Option<String>,
    pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Currency {
    pub name: Option<String>,
    pub symbol: Option<String>,
}

/// Currency code to details, in the order the provider listed them.
///
/// Serialised as a JSON object. Order matters: the first code is the
/// country's primary currency.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrencyMap(Vec<(String, Currency)>);

impl CurrencyMap {
    pub fn new(entries: Vec<(String, Currency)>) -> Self {
        Self(entries)
    }

    /// The first listed currency code.
    pub fn primary_code(&self) -> Option<&str> {
        self.0.first().map(|(code, _)| code.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for CurrencyMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (code, currency) in &self.0 {
            map.serialize_entry(code, currency)?;
        }
        map.end()
    }
}

/// Country metadata as resolved by the country provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryRecord {
    pub name: Option<String>,
    pub official_name: Option<String>,
    pub capital: Option<String>,
    pub population: Option<u64>,
    pub region: Option<String>,
    pub subregion: Option<String>,
    pub flags: Flags,
    pub coordinates: Option<Coordinates>,
    pub currencies: CurrencyMap,
}
