//! `CallerId` extractor: the authenticated user forwarded by the upstream auth layer.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use orderhub_core::error::AppError;
use orderhub_core::types::UserId;

use crate::error::ApiError;

/// Header carrying the caller's user ID.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The calling user, taken from the `X-User-Id` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerId(pub UserId);

impl<S> FromRequestParts<S> for CallerId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::authentication("Missing X-User-Id header"))?;

        let user_id = raw
            .trim()
            .parse::<UserId>()
            .map_err(|_| AppError::authentication(format!("Invalid X-User-Id: {raw}")))?;

        Ok(Self(user_id))
    }
}
