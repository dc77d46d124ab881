//! User identity extraction.
//!
//! The service sits behind an authenticating proxy that forwards the caller's
//! numeric id in the `X-User-ID` header. Requests without it, or with a value
//! that is not a positive integer, are treated as anonymous (user `0`).

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::HeaderName;
use axum::http::request::Parts;

use crate::domain::entities::ANONYMOUS_OWNER;
use crate::error::AppError;

pub static USER_ID_HEADER: HeaderName = HeaderName::from_static("x-user-id");

/// Caller identity taken from the `X-User-ID` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub i64);

impl UserId {
    pub fn is_anonymous(self) -> bool {
        self.0 == ANONYMOUS_OWNER
    }

    /// Returns the id, or [`AppError::Unauthorized`] for anonymous callers.
    pub fn require(self) -> Result<i64, AppError> {
        if self.is_anonymous() {
            return Err(AppError::Unauthorized);
        }
        Ok(self.0)
    }
}

impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(&USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|id| *id > 0)
            .unwrap_or(ANONYMOUS_OWNER);

        Ok(Self(id))
    }
}
