//! Response assembly: cache lookups, upstream fetches and normalization
//! for each resource the proxy exposes.
//!
//! # Caching layers
//!
//! - **raw**: every upstream response, keyed by endpoint + sorted params.
//!   Chapters and chapter info are served straight from this layer.
//! - **processed**: normalized verses pages, keyed by chapter + page. A hit
//!   here skips the raw layer and the upstream entirely.
//!
//! A verses miss goes through the raw layer first, then normalizes a deep
//! copy of the raw value. The raw entry is never modified, so it stays
//! identical to what upstream returned.
//!
//! # Failure semantics
//!
//! An upstream error aborts the request and nothing is cached for it. The
//! next request for the same resource goes upstream again.

mod builder;

pub use builder::{AssemblerBuilder, Furqan};

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::Result;
use crate::cache::{CacheKey, CacheStore, CachedValue, UpstreamRequest};
use crate::normalize::normalize_translations;
use crate::upstream::Upstream;

/// Serves proxy resources from the cache, filling it from upstream.
///
/// Cheap to share behind an `Arc`; all state lives in the [`CacheStore`].
pub struct ResponseAssembler {
    upstream: Arc<dyn Upstream>,
    cache: CacheStore,
}

impl ResponseAssembler {
    /// Create an assembler with a fresh, empty cache.
    pub fn new(upstream: Arc<dyn Upstream>) -> Self {
        Self::with_cache(upstream, CacheStore::new())
    }

    /// Create an assembler over an existing cache.
    pub fn with_cache(upstream: Arc<dyn Upstream>, cache: CacheStore) -> Self {
        Self { upstream, cache }
    }

    /// The backing cache.
    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Chapter list, passed through unchanged.
    #[instrument(skip(self))]
    pub async fn chapters(&self) -> Result<CachedValue> {
        self.fetch_raw(UpstreamRequest::chapters()).await
    }

    /// English chapter introduction, passed through unchanged.
    #[instrument(skip(self))]
    pub async fn chapter_info(&self, chapter_id: i64) -> Result<CachedValue> {
        self.fetch_raw(UpstreamRequest::chapter_info(chapter_id)).await
    }

    /// One page of a chapter's verses with normalized translation text.
    #[instrument(skip(self))]
    pub async fn verses(&self, chapter_id: i64, page: i64) -> Result<CachedValue> {
        let key = CacheKey::processed_verses(chapter_id, page);
        self.cache
            .get_or_try_insert_with(key, async {
                let raw = self
                    .fetch_raw(UpstreamRequest::verses_page(chapter_id, page))
                    .await?;

                // Normalize a deep copy; the raw entry stays as upstream sent it.
                let mut processed = Value::clone(&raw);
                let rewritten = normalize_translations(&mut processed);
                debug!(chapter_id, page, rewritten, "normalized translations");
                Ok(processed)
            })
            .await
    }

    /// Read-through fetch of one upstream request via the raw layer.
    ///
    /// Requests with the same endpoint and parameters (in any order) share
    /// one cache entry and, when concurrent, one upstream call.
    pub async fn fetch_raw(&self, request: UpstreamRequest) -> Result<CachedValue> {
        let fetch = self.upstream.fetch(&request.endpoint, &request.params);
        self.cache
            .get_or_try_insert_with(CacheKey::Raw(request.clone()), fetch)
            .await
    }
}
