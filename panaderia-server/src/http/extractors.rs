//! Custom Axum extractors
//!
//! Each wraps a stock extractor and turns its rejection into an
//! `ApiError::Validation`, so malformed input gets the same JSON body as
//! any other validation failure.

use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::models::ValidationError;

/// JSON body whose rejection is reported as a validation error
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ValidationError::InvalidBody {
                reason: rejection.body_text(),
            })?;
        Ok(Self(value))
    }
}

/// Query string whose rejection is reported as a validation error
pub struct ValidQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ValidationError::InvalidQuery {
                reason: rejection.body_text(),
            })?;
        Ok(Self(value))
    }
}

/// Extract and validate a producto id from path
///
/// Non-numeric ids are a validation error. Numeric ids outside the SERIAL
/// range can never match a row, so they are reported as not found.
pub struct ValidId(pub i32);

impl<S> FromRequestParts<S> for ValidId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::from(ValidationError::Required { field: "id" }))?;

        if let Ok(id) = id.parse::<i32>() {
            return Ok(Self(id));
        }

        let digits = id.strip_prefix('-').unwrap_or(&id);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidType {
                field: "id",
                expected: "an integer",
            }
            .into());
        }

        Err(ApiError::NotFound {
            resource: "producto",
            id,
        })
    }
}
