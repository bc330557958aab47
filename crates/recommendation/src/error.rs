//! Recommendation error types.

use common::ErrorKind;
use domain::DomainError;
use thiserror::Error;

use crate::evaluator::EvaluationError;

/// Errors that can occur while building a recommendation.
#[derive(Debug, Error)]
pub enum RecommendationError {
    /// A request parameter was rejected before any upstream call.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An upstream service has no record for the key.
    #[error("{service} has no record for '{key}' ({operation})")]
    NotFound {
        service: &'static str,
        operation: &'static str,
        key: String,
    },

    /// An upstream service could not be reached or answered unusably.
    #[error("{service} unavailable during {operation} for '{key}': {reason}")]
    Unavailable {
        service: &'static str,
        operation: &'static str,
        key: String,
        reason: String,
    },

    /// The rule evaluator's decision is missing or mistyped a field.
    #[error("Decision malformed at '{field}': {reason}")]
    DecisionMalformed { field: String, reason: String },

    /// The rule evaluator rejected the facts.
    #[error("Rule evaluation failed: {0}")]
    Evaluation(#[from] EvaluationError),

    /// The request deadline passed before the pipeline finished.
    #[error("{operation} cancelled after {timeout_ms} ms")]
    Cancelled {
        operation: &'static str,
        timeout_ms: u128,
    },

    /// The caller's token was rejected.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Domain error.
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

impl RecommendationError {
    pub(crate) fn unavailable(
        service: &'static str,
        operation: &'static str,
        key: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        RecommendationError::Unavailable {
            service,
            operation,
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        RecommendationError::DecisionMalformed {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Classifies the error for callers outside the pipeline.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RecommendationError::InvalidInput(_) => ErrorKind::InvalidInput,
            RecommendationError::NotFound { .. } => ErrorKind::NotFound,
            RecommendationError::Unavailable { .. } => ErrorKind::Unavailable,
            RecommendationError::DecisionMalformed { .. } => ErrorKind::DecisionMalformed,
            // An evaluator that cannot digest the facts is a rule-set/fact mismatch.
            RecommendationError::Evaluation(_) => ErrorKind::DecisionMalformed,
            RecommendationError::Cancelled { .. } => ErrorKind::Cancelled,
            RecommendationError::Unauthorized(_) => ErrorKind::Unauthorized,
            RecommendationError::Domain(e) => e.kind(),
        }
    }
}

/// Convenience type alias for recommendation results.
pub type Result<T> = std::result::Result<T, RecommendationError>;
