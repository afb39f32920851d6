//! Builder for configuring assembler instances

use std::sync::Arc;

use super::ResponseAssembler;
use crate::cache::CacheStore;
use crate::upstream::{DEFAULT_BASE_URL, Upstream, UpstreamClient, UpstreamCredentials};
use crate::{FurqanError, Result};

/// Main entry point for creating assembler instances.
pub struct Furqan;

impl Furqan {
    /// Create a new builder for configuring the assembler.
    pub fn builder() -> AssemblerBuilder {
        AssemblerBuilder::new()
    }
}

/// Builder for configuring assembler instances.
#[derive(Default)]
pub struct AssemblerBuilder {
    base_url: Option<String>,
    credentials: UpstreamCredentials,
    upstream: Option<Arc<dyn Upstream>>,
    cache: Option<CacheStore>,
}

impl AssemblerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upstream API base URL (default: the public Quran.com v4 API).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Credentials forwarded to the upstream API.
    pub fn credentials(mut self, credentials: UpstreamCredentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Use a custom upstream instead of the HTTP client.
    ///
    /// Overrides `base_url` and `credentials`.
    pub fn upstream(mut self, upstream: Arc<dyn Upstream>) -> Self {
        self.upstream = Some(upstream);
        self
    }

    /// Share an existing cache instead of starting empty.
    pub fn cache(mut self, cache: CacheStore) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Build the assembler.
    ///
    /// Fails if the base URL is not an `http://` or `https://` URL.
    pub fn build(self) -> Result<ResponseAssembler> {
        let upstream = match self.upstream {
            Some(upstream) => upstream,
            None => {
                let base_url = self
                    .base_url
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
                if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
                    return Err(FurqanError::Configuration(format!(
                        "upstream base URL must be http(s): {base_url}"
                    )));
                }
                Arc::new(UpstreamClient::with_base_url(base_url).credentials(self.credentials))
            }
        };

        Ok(ResponseAssembler::with_cache(
            upstream,
            self.cache.unwrap_or_default(),
        ))
    }
}
