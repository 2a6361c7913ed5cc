//! Upstream Module
//!
//! Single-attempt JSON GETs against the external providers.
//!
//! Adapters talk to providers through the [`JsonFetcher`] trait so tests can
//! substitute canned responses; [`UpstreamClient`] is the reqwest-backed
//! implementation used in production.

mod client;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::error::UpstreamError;

pub use client::{UpstreamClient, AIR_QUALITY_KEY_HEADER, UPSTREAM_TIMEOUT};

// == Fetcher Trait ==
/// Performs one GET and returns the parsed JSON body.
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    async fn get_json(&self, url: Url) -> Result<Value, UpstreamError>;
}

// == URL Helpers ==
/// Joins `segments` onto `base` as percent-encoded path segments and appends
/// the query parameters.
pub fn endpoint(base: &str, segments: &[&str], query: &[(&str, &str)]) -> Result<Url, UpstreamError> {
    let mut url = Url::parse(base)
        .map_err(|e| UpstreamError::Transport(format!("invalid provider URL {base}: {e}")))?;

    url.path_segments_mut()
        .map_err(|_| UpstreamError::Transport(format!("provider URL {base} cannot take a path")))?
        .pop_if_empty()
        .extend(segments);

    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Ok(url)
}

/// The URL with its query string removed, safe to log.
pub fn redacted(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}
