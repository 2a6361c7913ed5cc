//! Country Info Service
//!
//! Cache-through lookup: normalise the key, serve a live cache entry if
//! there is one, otherwise aggregate and store the result.

use std::sync::Arc;

use tracing::debug;

use crate::aggregator::Aggregator;
use crate::cache::SharedCache;
use crate::error::{AppError, Result};
use crate::models::{CompositeRecord, CountryKey};

/// Cache holding composite records.
pub type RecordCache = SharedCache<Arc<CompositeRecord>>;

/// A served record and where it came from.
#[derive(Debug, Clone)]
pub struct Lookup {
    pub record: Arc<CompositeRecord>,
    pub from_cache: bool,
}

/// Serves composite records through the TTL cache.
///
/// Concurrent misses for the same key are not coalesced: each one
/// aggregates independently and the last write wins.
#[derive(Clone)]
pub struct CountryInfoService {
    cache: RecordCache,
    aggregator: Aggregator,
}

impl CountryInfoService {
    pub fn new(cache: RecordCache, aggregator: Aggregator) -> Self {
        Self { cache, aggregator }
    }

    pub fn cache(&self) -> &RecordCache {
        &self.cache
    }

    /// Returns the composite record for a raw, user-supplied country name.
    ///
    /// # Errors
    /// - `Validation` if the name is blank
    /// - `CountryNotFound` / `Upstream` if country resolution fails; nothing is cached
    /// - `Internal` if the aggregation task dies
    pub async fn lookup(&self, raw_name: &str) -> Result<Lookup> {
        let key = CountryKey::parse(raw_name)?;
        let cache_key = key.cache_key();

        let cached = self.cache.write().await.get(&cache_key);
        if let Some(record) = cached {
            debug!("Cache hit for {}", cache_key);
            return Ok(Lookup {
                record,
                from_cache: true,
            });
        }
        debug!("Cache miss for {}", cache_key);

        // Runs detached so a client hanging up does not cancel upstream calls
        // or lose the result
        let aggregator = self.aggregator.clone();
        let cache = self.cache.clone();
        let task = tokio::spawn(async move {
            let record = Arc::new(aggregator.aggregate(&key).await?);
            cache.write().await.set(cache_key, record.clone());
            Ok::<_, AppError>(record)
        });

        let record = task
            .await
            .map_err(|e| AppError::Internal(format!("aggregation task failed: {e}")))??;

        Ok(Lookup {
            record,
            from_cache: false,
        })
    }
}
