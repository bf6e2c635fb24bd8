//! Request extractors.

use crate::errors::Error;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

/// Header carrying the caller's account id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Account id of the caller.
///
/// Whether the account exists is checked by the operation itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurrentUser(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse().ok())
            .map(Self)
            .ok_or(Error::Unauthorized)
    }
}
