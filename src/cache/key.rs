//! Structured cache keys.
//!
//! Two layers of keys share one store:
//!
//! - **raw** keys identify an unprocessed upstream response by endpoint
//!   path plus query parameters. Parameters are held sorted by name, so
//!   the same request built with arguments in a different order maps to
//!   the same key.
//! - **processed** keys identify a client-ready response by its logical
//!   identity (chapter + page), independent of how the upstream request
//!   is shaped.

use std::collections::BTreeMap;
use std::fmt;

/// Query parameters for an upstream request, ordered by name.
///
/// Inserting a name twice keeps the last value.
///
/// ```rust
/// # use furqan::cache::QueryParams;
/// let a = QueryParams::from_pairs([("page", "1"), ("language", "en")]);
/// let b = QueryParams::from_pairs([("language", "en"), ("page", "1")]);
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "language=en&page=1");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
    /// Empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from any sequence of name/value pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Add (or replace) a parameter.
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.0.insert(name.into(), value.to_string());
        self
    }

    /// Look up a parameter value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Pairs in name order, shaped for `reqwest::RequestBuilder::query`.
    pub fn to_pairs(&self) -> Vec<(&str, &str)> {
        self.iter().collect()
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (k, v)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(f, "{k}={v}")?;
        }
        Ok(())
    }
}

/// Translation resource requested for verses (Saheeh International).
pub const VERSES_TRANSLATION: u32 = 20;

/// Recitation requested for verse audio (Mishari Rashid al-Afasy).
pub const VERSES_RECITATION: u32 = 7;

/// Verses per upstream page.
pub const VERSES_PER_PAGE: u32 = 10;

/// One upstream GET: endpoint path plus query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UpstreamRequest {
    pub endpoint: String,
    pub params: QueryParams,
}

impl UpstreamRequest {
    pub fn new(endpoint: impl Into<String>, params: QueryParams) -> Self {
        Self {
            endpoint: endpoint.into(),
            params,
        }
    }

    /// `/chapters`, no parameters.
    pub fn chapters() -> Self {
        Self::new("/chapters", QueryParams::new())
    }

    /// `/chapters/{id}/info` in English.
    pub fn chapter_info(chapter_id: i64) -> Self {
        Self::new(
            format!("/chapters/{chapter_id}/info"),
            QueryParams::new().with("language", "en"),
        )
    }

    /// One page of `/verses/by_chapter/{id}` with English translation,
    /// recitation audio and Uthmani script, without word-by-word data.
    pub fn verses_page(chapter_id: i64, page: i64) -> Self {
        Self::new(
            format!("/verses/by_chapter/{chapter_id}"),
            QueryParams::new()
                .with("language", "en")
                .with("words", "false")
                .with("translations", VERSES_TRANSLATION)
                .with("audio", VERSES_RECITATION)
                .with("fields", "text_uthmani")
                .with("page", page)
                .with("per_page", VERSES_PER_PAGE),
        )
    }
}

impl fmt::Display for UpstreamRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.params.is_empty() {
            f.write_str(&self.endpoint)
        } else {
            write!(f, "{}?{}", self.endpoint, self.params)
        }
    }
}

/// Identity of one cacheable unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Unprocessed upstream response.
    Raw(UpstreamRequest),
    /// Normalized verses page, ready for clients.
    ProcessedVerses { chapter_id: i64, page: i64 },
}

impl CacheKey {
    pub fn chapters() -> Self {
        CacheKey::Raw(UpstreamRequest::chapters())
    }

    pub fn chapter_info(chapter_id: i64) -> Self {
        CacheKey::Raw(UpstreamRequest::chapter_info(chapter_id))
    }

    pub fn raw_verses(chapter_id: i64, page: i64) -> Self {
        CacheKey::Raw(UpstreamRequest::verses_page(chapter_id, page))
    }

    pub fn processed_verses(chapter_id: i64, page: i64) -> Self {
        CacheKey::ProcessedVerses { chapter_id, page }
    }

    /// Cache layer this key belongs to, used as a metrics label.
    pub fn layer(&self) -> &'static str {
        match self {
            CacheKey::Raw(_) => "raw",
            CacheKey::ProcessedVerses { .. } => "processed",
        }
    }
}

impl From<UpstreamRequest> for CacheKey {
    fn from(request: UpstreamRequest) -> Self {
        CacheKey::Raw(request)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Raw(request) => fmt::Display::fmt(request, f),
            CacheKey::ProcessedVerses { chapter_id, page } => {
                write!(f, "processed_verses::{chapter_id}::{page}")
            }
        }
    }
}
