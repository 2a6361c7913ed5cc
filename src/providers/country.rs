//! Country metadata adapter (REST Countries).

use std::fmt;
use std::sync::Arc;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{AppError, UpstreamError};
use crate::models::{Coordinates, CountryKey, CountryRecord, Currency, CurrencyMap, Flags};
use crate::providers::decode;
use crate::upstream::{endpoint, JsonFetcher};

// == Wire Types ==
#[derive(Debug, Deserialize)]
struct RawCountry {
    name: Option<RawName>,
    capital: Option<OneOrMany>,
    population: Option<u64>,
    region: Option<String>,
    subregion: Option<String>,
    flags: Option<RawFlags>,
    latlng: Option<Vec<Option<f64>>>,
    currencies: Option<OrderedCurrencies>,
}

#[derive(Debug, Deserialize)]
struct RawName {
    common: Option<String>,
    official: Option<String>,
}

/// `capital` is usually an array but some payloads carry a bare string.
/// Null array items are skipped.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<Option<String>>),
    One(String),
}

impl OneOrMany {
    fn first(self) -> Option<String> {
        match self {
            OneOrMany::Many(values) => values.into_iter().flatten().next(),
            OneOrMany::One(value) => Some(value),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawFlags {
    png: Option<String>,
    svg: Option<String>,
    alt: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCurrency {
    name: Option<String>,
    symbol: Option<String>,
}

/// Currency object decoded entry by entry so the provider's order survives.
#[derive(Debug, Default)]
struct OrderedCurrencies(Vec<(String, Currency)>);

impl<'de> Deserialize<'de> for OrderedCurrencies {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CurrenciesVisitor;

        impl<'de> Visitor<'de> for CurrenciesVisitor {
            type Value = OrderedCurrencies;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of currency code to currency details")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                // Null currency objects carry nothing worth keeping
                while let Some((code, raw)) = map.next_entry::<String, Option<RawCurrency>>()? {
                    let Some(raw) = raw else {
                        continue;
                    };
                    entries.push((
                        code,
                        Currency {
                            name: raw.name,
                            symbol: raw.symbol,
                        },
                    ));
                }
                Ok(OrderedCurrencies(entries))
            }
        }

        deserializer.deserialize_map(CurrenciesVisitor)
    }
}

impl From<RawCountry> for CountryRecord {
    fn from(raw: RawCountry) -> Self {
        let (name, official_name) = match raw.name {
            Some(name) => (name.common, name.official),
            None => (None, None),
        };
        let flags = raw
            .flags
            .map(|f| Flags {
                png: f.png,
                svg: f.svg,
                alt: f.alt,
            })
            .unwrap_or_default();
        let coordinates = match raw.latlng.as_deref() {
            Some([Some(lat), Some(lon), ..]) => Some(Coordinates { lat: *lat, lon: *lon }),
            _ => None,
        };

        CountryRecord {
            name,
            official_name,
            capital: raw.capital.and_then(OneOrMany::first),
            population: raw.population,
            region: raw.region,
            subregion: raw.subregion,
            flags,
            coordinates,
            currencies: CurrencyMap::new(raw.currencies.unwrap_or_default().0),
        }
    }
}

/// Decodes a name-search payload, keeping the provider's first match.
///
/// `Ok(None)` means the provider returned an empty list.
pub fn decode_countries(body: Value) -> Result<Option<CountryRecord>, UpstreamError> {
    let countries: Vec<RawCountry> = decode("country", body)?;
    Ok(countries.into_iter().next().map(CountryRecord::from))
}

// == Country Adapter ==
/// Resolves a country name to its metadata.
#[derive(Clone)]
pub struct CountryAdapter {
    fetcher: Arc<dyn JsonFetcher>,
    base_url: String,
}

impl CountryAdapter {
    pub fn new(fetcher: Arc<dyn JsonFetcher>, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
        }
    }

    /// Looks up `key` with the provider's partial, case-insensitive name
    /// search and returns the first match.
    ///
    /// # Errors
    /// - `CountryNotFound` when the provider has no match (empty list or 404)
    /// - `Upstream` for any other provider failure
    pub async fn resolve(&self, key: &CountryKey) -> Result<CountryRecord, AppError> {
        let url = endpoint(&self.base_url, &["name", key.as_str()], &[])?;

        let body = match self.fetcher.get_json(url).await {
            Ok(body) => body,
            Err(err) if err.status() == Some(404) => {
                debug!("Country provider has no match for '{}'", key);
                return Err(AppError::CountryNotFound(key.to_string()));
            }
            Err(err) => return Err(err.into()),
        };

        decode_countries(body)?.ok_or_else(|| AppError::CountryNotFound(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::testing::FakeFetcher;
    use serde_json::json;

    fn france() -> Value {
        json!([{
            "name": {"common": "France", "official": "French Republic"},
            "capital": ["Paris"],
            "population": 67391582,
            "region": "Europe",
            "subregion": "Western Europe",
            "flags": {"png": "https://flagcdn.com/w320/fr.png", "svg": "https://flagcdn.com/fr.svg"},
            "latlng": [46.0, 2.0],
            "currencies": {"EUR": {"name": "Euro", "symbol": "€"}}
        }])
    }

    #[test]
    fn test_decode_full_record() {
        let record = decode_countries(france()).unwrap().unwrap();

        assert_eq!(record.name.as_deref(), Some("France"));
        assert_eq!(record.official_name.as_deref(), Some("French Republic"));
        assert_eq!(record.capital.as_deref(), Some("Paris"));
        assert_eq!(record.population, Some(67_391_582));
        assert_eq!(record.coordinates, Some(Coordinates { lat: 46.0, lon: 2.0 }));
        assert_eq!(record.currencies.primary_code(), Some("EUR"));
        assert_eq!(record.flags.alt, None);
    }

    #[test]
    fn test_decode_sparse_record() {
        let record = decode_countries(json!([{"name": {"common": "Antarctica"}}]))
            .unwrap()
            .unwrap();

        assert_eq!(record.name.as_deref(), Some("Antarctica"));
        assert_eq!(record.official_name, None);
        assert_eq!(record.capital, None);
        assert_eq!(record.coordinates, None);
        assert!(record.currencies.is_empty());
        assert_eq!(record.flags, Flags::default());
    }

    #[test]
    fn test_decode_null_fields_are_absent() {
        let body = json!([{
            "name": {"common": "Bouvet Island", "official": null},
            "capital": [null],
            "population": null,
            "flags": null,
            "latlng": null,
            "currencies": {"NOK": null}
        }]);
        let record = decode_countries(body).unwrap().unwrap();

        assert_eq!(record.name.as_deref(), Some("Bouvet Island"));
        assert_eq!(record.official_name, None);
        assert_eq!(record.capital, None);
        assert_eq!(record.population, None);
        assert_eq!(record.coordinates, None);
        assert_eq!(record.flags, Flags::default());
        assert!(record.currencies.is_empty());
    }

    #[test]
    fn test_decode_null_coordinate_item() {
        let body = json!([{"capital": [null, "Sucre"], "latlng": [null, -65.0]}]);
        let record = decode_countries(body).unwrap().unwrap();

        assert_eq!(record.capital.as_deref(), Some("Sucre"));
        assert_eq!(record.coordinates, None);
    }

    #[tokio::test]
    async fn test_resolve_null_latlng_still_returns_record() {
        let fetcher = FakeFetcher::new().route(
            "/name/bouvet",
            Ok(json!([{"name": {"common": "Bouvet Island"}, "latlng": null}])),
        );
        let adapter = CountryAdapter::new(Arc::new(fetcher), "https://countries.test");

        let record = adapter
            .resolve(&CountryKey::parse("Bouvet").unwrap())
            .await
            .unwrap();

        assert_eq!(record.name.as_deref(), Some("Bouvet Island"));
        assert_eq!(record.coordinates, None);
    }

    #[test]
    fn test_decode_scalar_capital_and_short_latlng() {
        let record = decode_countries(json!([{"capital": "Bern", "latlng": [47.0]}]))
            .unwrap()
            .unwrap();

        assert_eq!(record.capital.as_deref(), Some("Bern"));
        assert_eq!(record.coordinates, None);
        assert_eq!(record.name, None);
    }

    #[test]
    fn test_decode_keeps_currency_order() {
        let body = json!([{
            "currencies": {
                "CHF": {"name": "Swiss franc", "symbol": "Fr."},
                "EUR": {"name": "Euro", "symbol": "€"}
            }
        }]);
        let record = decode_countries(body).unwrap().unwrap();
        assert_eq!(record.currencies.primary_code(), Some("CHF"));
        assert_eq!(record.currencies.len(), 2);
    }

    #[test]
    fn test_decode_picks_first_match() {
        let body = json!([
            {"name": {"common": "Guinea"}},
            {"name": {"common": "Guinea-Bissau"}}
        ]);
        let record = decode_countries(body).unwrap().unwrap();
        assert_eq!(record.name.as_deref(), Some("Guinea"));
    }

    #[test]
    fn test_decode_empty_and_malformed() {
        assert_eq!(decode_countries(json!([])).unwrap(), None);
        assert!(matches!(
            decode_countries(json!({"status": 200})),
            Err(UpstreamError::InvalidBody(_))
        ));
    }

    #[tokio::test]
    async fn test_resolve_queries_name_endpoint() {
        let fetcher = Arc::new(FakeFetcher::new().route("/name/france", Ok(france())));
        let adapter = CountryAdapter::new(fetcher.clone(), "https://countries.test/v3.1");

        let record = adapter
            .resolve(&CountryKey::parse(" France ").unwrap())
            .await
            .unwrap();

        assert_eq!(record.capital.as_deref(), Some("Paris"));
        assert_eq!(
            fetcher.calls()[0].as_str(),
            "https://countries.test/v3.1/name/france"
        );
    }

    #[tokio::test]
    async fn test_resolve_not_found() {
        let key = CountryKey::parse("Atlantis").unwrap();

        let on_404 = CountryAdapter::new(Arc::new(FakeFetcher::new()), "https://countries.test");
        assert!(matches!(
            on_404.resolve(&key).await,
            Err(AppError::CountryNotFound(_))
        ));

        let on_empty = CountryAdapter::new(
            Arc::new(FakeFetcher::new().route("/name/atlantis", Ok(json!([])))),
            "https://countries.test",
        );
        assert!(matches!(
            on_empty.resolve(&key).await,
            Err(AppError::CountryNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_resolve_other_failures_propagate() {
        let fetcher = FakeFetcher::new().route(
            "/name/france",
            Err(UpstreamError::http(500, "Internal Server Error", "boom")),
        );
        let adapter = CountryAdapter::new(Arc::new(fetcher), "https://countries.test");

        let err = adapter
            .resolve(&CountryKey::parse("France").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Upstream(UpstreamError::Http { status: 500, .. })));
    }
}
