//! Furqan error types

use std::sync::Arc;

/// Furqan error types
#[derive(Debug, thiserror::Error)]
pub enum FurqanError {
    // Upstream errors
    /// Upstream answered with a non-200 status. Surfaced to clients verbatim.
    #[error("upstream error ({status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(String),

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Client errors
    /// Path or query parameter could not be parsed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl FurqanError {
    /// HTTP status code this error should be reported with.
    ///
    /// Upstream failures keep their original status and unparsable client
    /// input is 422. Anything that never produced a usable upstream answer
    /// is a bad gateway.
    pub fn status_code(&self) -> u16 {
        match self {
            FurqanError::Upstream { status, .. } => *status,
            FurqanError::InvalidRequest(_) => 422,
            FurqanError::Configuration(_) => 500,
            FurqanError::Http(_) | FurqanError::Json(_) => 502,
        }
    }

    /// Text reported to the client as the error detail.
    pub fn detail(&self) -> String {
        match self {
            FurqanError::Upstream { body, .. } => body.clone(),
            FurqanError::InvalidRequest(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

/// Unwrap an error shared between single-flight waiters.
///
/// The last holder gets the original back; everyone else gets an
/// equivalent copy.
impl From<Arc<FurqanError>> for FurqanError {
    fn from(shared: Arc<FurqanError>) -> Self {
        Arc::try_unwrap(shared).unwrap_or_else(|shared| match shared.as_ref() {
            FurqanError::Upstream { status, body } => FurqanError::Upstream {
                status: *status,
                body: body.clone(),
            },
            FurqanError::Http(msg) => FurqanError::Http(msg.clone()),
            FurqanError::Json(err) => FurqanError::Json(serde::de::Error::custom(err)),
            FurqanError::InvalidRequest(msg) => FurqanError::InvalidRequest(msg.clone()),
            FurqanError::Configuration(msg) => FurqanError::Configuration(msg.clone()),
        })
    }
}

impl From<reqwest::Error> for FurqanError {
    fn from(err: reqwest::Error) -> Self {
        FurqanError::Http(err.to_string())
    }
}

/// Result type alias for Furqan operations
pub type Result<T> = std::result::Result<T, FurqanError>;
