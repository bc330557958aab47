//! Bearer token extraction.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::error::ApiError;

/// Token from an `Authorization: Bearer <token>` header.
///
/// Only extracts the token; validation happens against the identity
/// service in the handler.
#[derive(Clone)]
pub struct BearerToken(pub String);

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| ApiError::Unauthorized("missing authorization header".to_string()))?;
        let value = header
            .to_str()
            .map_err(|_| ApiError::Unauthorized("authorization header is not text".to_string()))?;

        let (scheme, token) = value
            .split_once(' ')
            .ok_or_else(|| ApiError::Unauthorized("malformed authorization header".to_string()))?;
        if !scheme.eq_ignore_ascii_case("bearer") {
            return Err(ApiError::Unauthorized(format!(
                "unsupported authorization scheme '{scheme}'"
            )));
        }

        let token = token.trim();
        if token.is_empty() {
            return Err(ApiError::Unauthorized("empty bearer token".to_string()));
        }
        Ok(Self(token.to_string()))
    }
}
