//! Token validation against the identity service.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use common::UserId;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::http::{self, Call};
use crate::error::{RecommendationError, Result};

const SERVICE: &str = "identity service";
const VALIDATE_PATH: &str = "/api/private/user/validate";

/// Identity carried by a validated token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub user_id: UserId,
    pub email: String,
}

/// Validates bearer tokens.
///
/// Implementations fail closed: a token that is empty, rejected, or
/// answered with anything undecodable yields `Unauthorized`.
#[async_trait]
pub trait TokenValidator: Send + Sync {
    async fn validate_token(&self, token: &str) -> Result<TokenClaims>;
}

#[async_trait]
impl<T: TokenValidator + ?Sized> TokenValidator for Arc<T> {
    async fn validate_token(&self, token: &str) -> Result<TokenClaims> {
        (**self).validate_token(token).await
    }
}

#[derive(Debug, Deserialize)]
struct ValidationPayload {
    is_valid: bool,
    user_id: i64,
    email_user: String,
}

fn check_claims(payload: ValidationPayload) -> Result<TokenClaims> {
    let user_id = UserId::new(payload.user_id);
    if !payload.is_valid {
        return Err(RecommendationError::Unauthorized(
            "token rejected by identity service".to_string(),
        ));
    }
    if !user_id.is_valid() {
        return Err(RecommendationError::Unauthorized(format!(
            "token resolved to unusable user id {user_id}"
        )));
    }
    Ok(TokenClaims {
        user_id,
        email: payload.email_user,
    })
}

fn require_token(token: &str) -> Result<&str> {
    let token = token.trim();
    if token.is_empty() {
        return Err(RecommendationError::Unauthorized("missing token".to_string()));
    }
    Ok(token)
}

/// Token validator backed by the identity service's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpTokenValidator {
    client: Client,
    base_url: String,
}

impl HttpTokenValidator {
    /// Creates a validator that calls the service at `base_url`.
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl TokenValidator for HttpTokenValidator {
    #[tracing::instrument(skip_all, fields(service = SERVICE))]
    async fn validate_token(&self, token: &str) -> Result<TokenClaims> {
        let token = require_token(token)?;
        let call = Call {
            service: SERVICE,
            operation: "validate_token",
            key: "<token>",
        };
        let url = http::endpoint(&self.base_url, VALIDATE_PATH);

        let response = http::send(&self.client, &url, &[("token", token)], call).await?;
        let status = response.status();
        match status {
            s if s.is_success() => {}
            StatusCode::BAD_REQUEST
            | StatusCode::UNAUTHORIZED
            | StatusCode::FORBIDDEN
            | StatusCode::NOT_FOUND => {
                return Err(RecommendationError::Unauthorized(format!(
                    "identity service answered {status}"
                )));
            }
            _ => return Err(call.unavailable(format!("unexpected status {status}"))),
        }

        let payload: ValidationPayload = http::decode(response, call)
            .await
            .map_err(|_| RecommendationError::Unauthorized("undecodable validation".to_string()))?;
        let claims = check_claims(payload)?;
        tracing::debug!(user_id = %claims.user_id, "token validated");
        Ok(claims)
    }
}

/// In-memory token validator for testing and local runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTokenValidator {
    tokens: Arc<RwLock<HashMap<String, TokenClaims>>>,
    unavailable: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl InMemoryTokenValidator {
    /// Creates a validator that accepts no tokens.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts `token` as the given user.
    pub async fn insert(&self, token: impl Into<String>, claims: TokenClaims) {
        self.tokens.write().await.insert(token.into(), claims);
    }

    /// Configures the validator to fail with `Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Returns the number of validations attempted.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenValidator for InMemoryTokenValidator {
    async fn validate_token(&self, token: &str) -> Result<TokenClaims> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let token = require_token(token)?;

        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RecommendationError::unavailable(
                SERVICE,
                "validate_token",
                "<token>",
                "in-memory service switched off",
            ));
        }

        self.tokens
            .read()
            .await
            .get(token)
            .cloned()
            .ok_or_else(|| RecommendationError::Unauthorized("unknown token".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use common::ErrorKind;

    use super::*;

    fn claims(id: i64) -> TokenClaims {
        TokenClaims {
            user_id: UserId::new(id),
            email: "budi@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_known_token_yields_claims() {
        let validator = InMemoryTokenValidator::new();
        validator.insert("secret", claims(1)).await;

        assert_eq!(validator.validate_token("secret").await.unwrap(), claims(1));
    }

    #[tokio::test]
    async fn test_unknown_and_blank_tokens_are_rejected() {
        let validator = InMemoryTokenValidator::new();
        validator.insert("secret", claims(1)).await;

        let err = validator.validate_token("guess").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        let err = validator.validate_token("  ").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn test_invalid_payload_fails_closed() {
        let rejected = ValidationPayload {
            is_valid: false,
            user_id: 1,
            email_user: "budi@example.com".to_string(),
        };
        assert!(matches!(
            check_claims(rejected),
            Err(RecommendationError::Unauthorized(_))
        ));

        let no_user = ValidationPayload {
            is_valid: true,
            user_id: 0,
            email_user: String::new(),
        };
        assert!(matches!(
            check_claims(no_user),
            Err(RecommendationError::Unauthorized(_))
        ));
    }
}
