//! Telemetry metric name constants.
//!
//! Centralised metric names for furqan operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `furqan_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `layer` — cache layer: "raw" or "processed"
//! - `status` — upstream HTTP status code, or "error" when no response arrived

/// Total requests sent to the upstream API.
///
/// Labels: `status`.
pub const UPSTREAM_REQUESTS_TOTAL: &str = "furqan_upstream_requests_total";

/// Upstream request duration in seconds.
pub const UPSTREAM_REQUEST_DURATION_SECONDS: &str = "furqan_upstream_request_duration_seconds";

/// Total cache hits.
///
/// Labels: `layer`.
pub const CACHE_HITS_TOTAL: &str = "furqan_cache_hits_total";

/// Total cache misses.
///
/// A request that waits on another caller's in-flight fetch for the same
/// key is a miss, not a hit.
///
/// Labels: `layer`.
pub const CACHE_MISSES_TOTAL: &str = "furqan_cache_misses_total";
