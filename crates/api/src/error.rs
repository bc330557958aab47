//! API error types with HTTP response mapping.

use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use common::ErrorKind;
use domain::DomainError;
use recommendation::RecommendationError;
use serde::Serialize;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Request could not be parsed.
    BadRequest(String),
    /// Missing or malformed credentials.
    Unauthorized(String),
    /// Venue state error.
    Domain(DomainError),
    /// Recommendation pipeline error.
    Recommendation(RecommendationError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

impl ApiError {
    /// Classifies the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::BadRequest(_) => ErrorKind::InvalidInput,
            ApiError::Unauthorized(_) => ErrorKind::Unauthorized,
            ApiError::Domain(err) => err.kind(),
            ApiError::Recommendation(err) => err.kind(),
        }
    }

    fn detail(&self) -> String {
        match self {
            ApiError::BadRequest(msg) | ApiError::Unauthorized(msg) => msg.clone(),
            ApiError::Domain(err) => err.to_string(),
            ApiError::Recommendation(err) => err.to_string(),
        }
    }
}

/// HTTP status for each error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::DecisionMalformed => StatusCode::BAD_GATEWAY,
        ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
        ErrorKind::WriteConflict => StatusCode::CONFLICT,
        ErrorKind::Cancelled => StatusCode::GATEWAY_TIMEOUT,
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let status = status_for(kind);
        let detail = self.detail();

        if status.is_server_error() {
            tracing::error!(code = kind.code(), error = %detail, "request failed");
        } else {
            tracing::warn!(code = kind.code(), error = %detail, "request rejected");
        }

        // Only input errors echo the detail; it describes the caller's own request.
        let message = match kind {
            ErrorKind::InvalidInput => detail,
            _ => kind.public_message().to_string(),
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: kind.code(),
                message,
            },
        };

        let mut response = (status, Json(body)).into_response();
        if kind.is_retryable() {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from_static("1"));
        }
        if kind == ErrorKind::Unauthorized {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<RecommendationError> for ApiError {
    fn from(err: RecommendationError) -> Self {
        ApiError::Recommendation(err)
    }
}
