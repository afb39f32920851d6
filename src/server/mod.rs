//! HTTP service and its configuration.
//!
//! This module provides:
//! - The axum router exposing the proxy endpoints (`routes`)
//! - Configuration types (`config`)
//!
//! # Endpoints
//!
//! | Path | Source |
//! |---|---|
//! | `GET /api` | liveness message |
//! | `GET /api/chapters` | [`ResponseAssembler::chapters`] |
//! | `GET /api/chapters/{chapter_id}/info` | [`ResponseAssembler::chapter_info`] |
//! | `GET /api/chapters/{chapter_id}/verses?page=N` | [`ResponseAssembler::verses`] |
//!
//! Resource responses carry a long-lived immutable `Cache-Control` header:
//! upstream content for a given URL never changes.
//!
//! # Errors
//!
//! Upstream failures keep their status code and are returned as
//! `{"detail": "<upstream body>"}`. Transport and decoding failures are
//! reported as `502 Bad Gateway`. A chapter ID or page that is not an
//! integer is answered with `422` and a `{"detail": …}` body naming the
//! parse failure. Negative integers are forwarded and the upstream's own
//! answer is passed through.

pub mod config;
mod extract;
mod routes;

pub use routes::{CACHE_CONTROL_IMMUTABLE, router};
