//! Route definitions, handlers and the error-to-response mapping.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use super::extract::{ApiPath, ApiQuery};
use crate::cache::CachedValue;
use crate::{FurqanError, ResponseAssembler, Result};

/// `Cache-Control` value sent with every upstream-derived resource.
pub const CACHE_CONTROL_IMMUTABLE: &str = "public, max-age=31536000, immutable";

type SharedAssembler = Arc<ResponseAssembler>;

/// Build the proxy router.
///
/// Cross-origin requests are accepted only from `allowed_origins`, and
/// only for `GET`. Fails if an origin is not a valid header value.
pub fn router(assembler: SharedAssembler, allowed_origins: &[String]) -> Result<Router> {
    Ok(Router::new()
        .route("/api", get(api_root))
        .route("/api/chapters", get(chapters))
        .route("/api/chapters/{chapter_id}/info", get(chapter_info))
        .route("/api/chapters/{chapter_id}/verses", get(verses))
        .with_state(assembler)
        .layer(cors_layer(allowed_origins)?)
        .layer(TraceLayer::new_for_http()))
}

fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer> {
    let origins = allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|e| {
                FurqanError::Configuration(format!("invalid CORS origin {origin:?}: {e}"))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

// ============================================================================
// Handlers
// ============================================================================

async fn api_root() -> Json<Value> {
    Json(json!({ "status": "ok", "message": "Quran API Ready" }))
}

async fn chapters(State(assembler): State<SharedAssembler>) -> Result<Response> {
    Ok(immutable(assembler.chapters().await?))
}

async fn chapter_info(
    State(assembler): State<SharedAssembler>,
    ApiPath(chapter_id): ApiPath<i64>,
) -> Result<Response> {
    Ok(immutable(assembler.chapter_info(chapter_id).await?))
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    #[serde(default = "first_page")]
    page: i64,
}

fn first_page() -> i64 {
    1
}

async fn verses(
    State(assembler): State<SharedAssembler>,
    ApiPath(chapter_id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<Response> {
    Ok(immutable(assembler.verses(chapter_id, query.page).await?))
}

fn immutable(value: CachedValue) -> Response {
    (
        [(header::CACHE_CONTROL, CACHE_CONTROL_IMMUTABLE)],
        Json(value),
    )
        .into_response()
}

// ============================================================================
// Errors
// ============================================================================

impl IntoResponse for FurqanError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::BAD_GATEWAY);
        warn!(status = status.as_u16(), error = %self, "request failed");
        (status, Json(json!({ "detail": self.detail() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_origin_rejected() {
        let result = cors_layer(&["bad\norigin".to_string()]);
        assert!(result.is_err());
    }

    #[test]
    fn upstream_error_keeps_status() {
        let response = FurqanError::Upstream {
            status: 404,
            body: "{\"error\":\"not found\"}".into(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn transport_error_is_bad_gateway() {
        let response = FurqanError::Http("connection refused".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
