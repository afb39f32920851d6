//! Process-lifetime response cache.
//!
//! [`CacheStore`] maps a [`CacheKey`] to an upstream-shaped JSON value.
//! One store holds both layers (raw upstream responses and processed
//! client responses); the key variant tells them apart.
//!
//! # Lifetime and bounds
//!
//! Entries are written once and never expire or get evicted. Memory grows
//! with the number of distinct keys requested for as long as the process
//! runs. That is an accepted limitation: the upstream dataset is small and
//! static.
//!
//! # Single flight
//!
//! [`CacheStore::get_or_try_insert_with`] coalesces concurrent misses on
//! the same key: the first caller runs the initializer, later callers wait
//! for its outcome. A failed initializer stores nothing, so the next
//! request retries the upstream.

pub mod key;

pub use key::{CacheKey, QueryParams, UpstreamRequest};

use std::future::Future;
use std::sync::Arc;

use moka::future::Cache;
use serde_json::Value;
use tracing::debug;

use crate::telemetry;
use crate::{FurqanError, Result};

/// Shared, cheaply clonable handle to a cached JSON value.
pub type CachedValue = Arc<Value>;

/// In-memory key → JSON store shared by all request handlers.
///
/// Cloning the store clones a handle; all clones see the same entries.
#[derive(Clone)]
pub struct CacheStore {
    entries: Cache<CacheKey, CachedValue>,
}

impl CacheStore {
    /// Create an empty, unbounded store.
    pub fn new() -> Self {
        Self {
            entries: Cache::builder().build(),
        }
    }

    /// Look up a cached value.
    ///
    /// Returns `None` on cache miss. Emits cache hit/miss metrics.
    pub async fn get(&self, key: &CacheKey) -> Option<CachedValue> {
        let hit = self.entries.get(key).await;
        record_lookup(key, hit.is_some());
        hit
    }

    /// Store a value unless the key is already present.
    ///
    /// Entries are write-once: the first value stored for a key is kept.
    pub async fn insert(&self, key: CacheKey, value: impl Into<CachedValue>) {
        self.entries.entry(key).or_insert(value.into()).await;
    }

    /// Whether `key` has an entry. Does not count as a lookup.
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Return the cached value for `key`, or run `init` to produce it.
    ///
    /// Concurrent callers missing on the same key share one `init` run.
    /// On error nothing is cached and every waiter receives the error.
    pub async fn get_or_try_insert_with<F>(&self, key: CacheKey, init: F) -> Result<CachedValue>
    where
        F: Future<Output = Result<Value>>,
    {
        if let Some(value) = self.entries.get(&key).await {
            record_lookup(&key, true);
            return Ok(value);
        }
        // Joining someone else's in-flight fetch still counts as a miss.
        record_lookup(&key, false);

        let entry = self
            .entries
            .entry(key)
            .or_try_insert_with(async { init.await.map(Arc::new) })
            .await
            .map_err(FurqanError::from)?;

        if entry.is_fresh() {
            debug!(key = %entry.key(), "cached new entry");
        }
        Ok(entry.into_value())
    }

    /// Number of entries currently stored.
    pub async fn len(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }

    /// Whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new()
    }
}

fn record_lookup(key: &CacheKey, hit: bool) {
    let layer = key.layer();
    if hit {
        metrics::counter!(telemetry::CACHE_HITS_TOTAL, "layer" => layer).increment(1);
    } else {
        metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "layer" => layer).increment(1);
    }
}
