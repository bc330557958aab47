//! Domain error types.

use common::ErrorKind;
use thiserror::Error;
use venue_store::VenueStoreError;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A request parameter was rejected before touching the store.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The named venue does not exist.
    #[error("Venue not found: {0}")]
    VenueNotFound(String),

    /// The venue store failed.
    #[error("Venue store error during {operation} for '{key}': {source}")]
    Store {
        operation: &'static str,
        key: String,
        #[source]
        source: VenueStoreError,
    },
}

impl DomainError {
    /// Wraps a store error with the operation and key that triggered it.
    pub fn store(operation: &'static str, key: impl Into<String>, source: VenueStoreError) -> Self {
        DomainError::Store {
            operation,
            key: key.into(),
            source,
        }
    }

    /// Classifies the error for callers outside the domain.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::InvalidInput(_) => ErrorKind::InvalidInput,
            DomainError::VenueNotFound(_) => ErrorKind::NotFound,
            DomainError::Store { source, .. } => source.kind(),
        }
    }
}
