//! Upstream content API access.
//!
//! The assembler talks to the upstream through the [`Upstream`] trait so it
//! can be driven by [`UpstreamClient`] in production and by an in-process
//! fake in tests.
//!
//! # Failure semantics
//!
//! A fetch is one request: no retries, no fallback. Any status other than
//! 200 becomes [`FurqanError::Upstream`](crate::FurqanError::Upstream)
//! carrying the status and body text untouched, so the HTTP layer can hand
//! it back to the client as-is.

pub mod client;

pub use client::{DEFAULT_BASE_URL, UpstreamClient, UpstreamCredentials};

use async_trait::async_trait;
use serde_json::Value;

use crate::Result;
use crate::cache::QueryParams;

/// Source of raw upstream JSON.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Name for logging/debugging.
    fn name(&self) -> &str;

    /// GET `endpoint` with `params` and return the decoded JSON body.
    ///
    /// `endpoint` is a path relative to the upstream base URL, starting
    /// with `/` (e.g. `/chapters/1/info`).
    async fn fetch(&self, endpoint: &str, params: &QueryParams) -> Result<Value>;
}
