//! Furqan - read-through caching proxy for the Quran.com content API
//!
//! This crate re-exposes a fixed set of upstream resources (chapter list,
//! chapter info, paginated verses with translations), caching every
//! upstream response for the life of the process and cleaning footnote
//! markup out of translation text before it reaches clients.
//!
//! # Example
//!
//! ```rust,no_run
//! use furqan::Furqan;
//!
//! #[tokio::main]
//! async fn main() -> furqan::Result<()> {
//!     let assembler = Furqan::builder().build()?;
//!
//!     // First call goes upstream, later calls are served from the cache.
//!     let verses = assembler.verses(2, 1).await?;
//!     println!("{}", verses["verses"][0]["translations"][0]["text"]);
//!     Ok(())
//! }
//! ```
//!
//! # HTTP service (requires `server` feature)
//!
//! [`server::router`] wraps an assembler in an axum router serving
//! `/api/chapters`, `/api/chapters/{id}/info` and
//! `/api/chapters/{id}/verses?page=N`. The `furqand` binary runs it.

pub mod assembler;
pub mod cache;
pub mod error;
pub mod normalize;
#[cfg(feature = "server")]
pub mod server;
pub mod telemetry;
pub mod upstream;
pub mod version;

// Re-export main types at crate root
pub use assembler::{AssemblerBuilder, Furqan, ResponseAssembler};
pub use cache::{CacheKey, CacheStore, CachedValue, QueryParams, UpstreamRequest};
pub use error::{FurqanError, Result};
pub use upstream::{Upstream, UpstreamClient, UpstreamCredentials};
pub use version::{PKG_VERSION, version_string};
