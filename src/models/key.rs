//! Country key normalisation.

use std::fmt;

use crate::cache::{CacheKey, Namespace};
use crate::error::AppError;

/// A trimmed, lower-cased country query.
///
/// `"France"`, `"france"` and `" France "` all produce the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CountryKey(String);

impl CountryKey {
    /// Normalises raw user input, rejecting blank names.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(AppError::Validation(
                "Country name must not be empty".to_string(),
            ));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(Namespace::Country, &self.0)
    }
}

impl fmt::Display for CountryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
