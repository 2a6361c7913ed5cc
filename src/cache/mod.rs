//! Cache Module
//!
//! Time-bounded in-memory cache for composite country records.

mod clock;
mod entry;
mod key;
mod lru;
mod stats;
mod store;


use std::sync::Arc;

use tokio::sync::RwLock;

// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use key::{CacheKey, Namespace};
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::CacheStore;

/// Cache store shared between request handlers and the sweep task.
pub type SharedCache<V> = Arc<RwLock<CacheStore<V>>>;
