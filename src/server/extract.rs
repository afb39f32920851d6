//! Request extractors whose rejections render as [`FurqanError`].
//!
//! axum's own [`Path`] and [`Query`] reject bad input with a plain-text
//! body. These wrappers turn the rejection into
//! [`FurqanError::InvalidRequest`] so every error reply has the same
//! `{"detail": …}` JSON shape.

use axum::extract::{FromRequestParts, Path, Query};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::FurqanError;

/// [`Path`] with a JSON error reply.
#[derive(Debug)]
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = FurqanError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(value)| ApiPath(value))
            .map_err(|rejection| FurqanError::InvalidRequest(rejection.body_text()))
    }
}

/// [`Query`] with a JSON error reply.
#[derive(Debug)]
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = FurqanError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| ApiQuery(value))
            .map_err(|rejection| FurqanError::InvalidRequest(rejection.body_text()))
    }
}
