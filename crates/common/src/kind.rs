//! Stable error taxonomy shared by every layer.

use serde::Serialize;

/// The externally visible classification of a failure.
///
/// Every crate-level error maps onto exactly one kind. The kind, not the
/// error text, is what crosses the service boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// A profile, venue or other keyed record does not exist.
    NotFound,
    /// An upstream service or the store failed transiently.
    Unavailable,
    /// The rule evaluator returned a decision without the fields we consume.
    DecisionMalformed,
    /// The request parameters were rejected before any adapter call.
    InvalidInput,
    /// A locked read-modify-write on venue state could not be committed.
    WriteConflict,
    /// The request deadline passed or the caller went away.
    Cancelled,
    /// The caller's token was missing or rejected.
    Unauthorized,
}

impl ErrorKind {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Unavailable => "UNAVAILABLE",
            ErrorKind::DecisionMalformed => "DECISION_MALFORMED",
            ErrorKind::InvalidInput => "INVALID_INPUT",
            ErrorKind::WriteConflict => "WRITE_CONFLICT",
            ErrorKind::Cancelled => "CANCELLED",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
        }
    }

    /// Generic message that is safe to show to a caller.
    pub fn public_message(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "The requested resource was not found",
            ErrorKind::Unavailable => "A dependency is temporarily unavailable",
            ErrorKind::DecisionMalformed => "The recommendation rules produced an unusable decision",
            ErrorKind::InvalidInput => "The request is invalid",
            ErrorKind::WriteConflict => "The update could not be committed, retry later",
            ErrorKind::Cancelled => "The request was cancelled before it completed",
            ErrorKind::Unauthorized => "Missing or invalid credentials",
        }
    }

    /// Whether a caller may retry the same request with backoff.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorKind::Unavailable | ErrorKind::WriteConflict | ErrorKind::Cancelled
        )
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_serialized_form() {
        for kind in [
            ErrorKind::NotFound,
            ErrorKind::Unavailable,
            ErrorKind::DecisionMalformed,
            ErrorKind::InvalidInput,
            ErrorKind::WriteConflict,
            ErrorKind::Cancelled,
            ErrorKind::Unauthorized,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.code()));
        }
    }

    #[test]
    fn only_transient_kinds_are_retryable() {
        assert!(ErrorKind::Unavailable.is_retryable());
        assert!(ErrorKind::WriteConflict.is_retryable());
        assert!(!ErrorKind::DecisionMalformed.is_retryable());
        assert!(!ErrorKind::InvalidInput.is_retryable());
        assert!(!ErrorKind::NotFound.is_retryable());
    }
}
