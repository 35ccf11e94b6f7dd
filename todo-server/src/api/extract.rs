//! Extractors that reject with [`AppError`]
//!
//! axum's own `Json` and `Query` reject with a plain-text body; routes use
//! these wrappers so malformed requests come back in the usual response
//! envelope.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use http::request::Parts;
use serde::de::DeserializeOwned;

use crate::utils::{AppError, ErrorCode};

/// JSON body; any rejection is `ValidationFailed`
pub struct ApiJson<T>(pub T);

/// JSON body of an order write
///
/// Well-formed JSON with a wrong shape (a non-integer `order`, a missing id)
/// is an `InvalidOperation`; unparsable bodies stay `ValidationFailed`.
pub struct OrderJson<T>(pub T);

/// Query string; any rejection is `ValidationFailed`
pub struct ApiQuery<T>(pub T);

fn body_error(rejection: &JsonRejection, code: ErrorCode) -> AppError {
    tracing::debug!(reason = %rejection.body_text(), "Rejected request body");
    AppError::with_message(code, rejection.body_text())
        .with_detail("status", rejection.status().as_u16())
}

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(value)| Self(value))
            .map_err(|rejection| body_error(&rejection, ErrorCode::ValidationFailed))
    }
}

impl<S, T> FromRequest<S> for OrderJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection @ JsonRejection::JsonDataError(_)) => {
                Err(body_error(&rejection, ErrorCode::InvalidOperation))
            }
            Err(rejection) => Err(body_error(&rejection, ErrorCode::ValidationFailed)),
        }
    }
}

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| Self(value))
            .map_err(|rejection: QueryRejection| {
                tracing::debug!(reason = %rejection.body_text(), "Rejected query string");
                AppError::validation(rejection.body_text())
                    .with_detail("status", rejection.status().as_u16())
            })
    }
}
