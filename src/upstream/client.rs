//! HTTP client for the Quran.com v4 content API.
//!
//! See: <https://api-docs.quran.com/docs/quran.com_versioned/4.0.0/>

use std::time::Instant;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use super::Upstream;
use crate::cache::QueryParams;
use crate::telemetry;
use crate::{FurqanError, Result};

/// Default base URL for the public Quran.com API.
pub const DEFAULT_BASE_URL: &str = "https://api.quran.com/api/v4";

/// Optional credentials forwarded with every upstream request.
///
/// The public API needs none; gated deployments issue a token and
/// client id.
#[derive(Clone, Default)]
pub struct UpstreamCredentials {
    pub auth_token: Option<String>,
    pub client_id: Option<String>,
}

impl std::fmt::Debug for UpstreamCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamCredentials")
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("client_id", &self.client_id)
            .finish()
    }
}

/// Client for the upstream content API.
#[derive(Clone, Debug)]
pub struct UpstreamClient {
    http: Client,
    base_url: String,
    credentials: UpstreamCredentials,
}

impl UpstreamClient {
    /// Create a client for the public API.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base_url,
            credentials: UpstreamCredentials::default(),
        }
    }

    /// Attach credentials sent as `x-auth-token` / `x-client-id` headers.
    pub fn credentials(mut self, credentials: UpstreamCredentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, endpoint: &str, params: &QueryParams) -> Result<Value> {
        let url = format!("{}{}", self.base_url, endpoint);

        let mut request = self.http.get(&url).query(&params.to_pairs());
        if let Some(token) = &self.credentials.auth_token {
            request = request.header("x-auth-token", token);
        }
        if let Some(client_id) = &self.credentials.client_id {
            request = request.header("x-client-id", client_id);
        }

        let response = request.send().await.map_err(|e| {
            warn!(%url, error = %e, "upstream unreachable");
            FurqanError::Http(format!("upstream request to {url} failed: {e}"))
        })?;

        let status = response.status();
        metrics::counter!(
            telemetry::UPSTREAM_REQUESTS_TOTAL,
            "status" => status.as_u16().to_string()
        )
        .increment(1);

        let body = response.text().await?;
        if status != StatusCode::OK {
            warn!(%url, status = status.as_u16(), "upstream returned error");
            return Err(FurqanError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

impl Default for UpstreamClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Upstream for UpstreamClient {
    fn name(&self) -> &str {
        "quran.com"
    }

    async fn fetch(&self, endpoint: &str, params: &QueryParams) -> Result<Value> {
        let start = Instant::now();
        debug!(endpoint, %params, "upstream fetch");

        let result = self.send(endpoint, params).await;

        metrics::histogram!(telemetry::UPSTREAM_REQUEST_DURATION_SECONDS)
            .record(start.elapsed().as_secs_f64());
        if let Err(FurqanError::Http(_)) = &result {
            metrics::counter!(telemetry::UPSTREAM_REQUESTS_TOTAL, "status" => "error")
                .increment(1);
        }
        result
    }
}
