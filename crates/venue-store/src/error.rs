use common::ErrorKind;
use thiserror::Error;

/// Errors that can occur when interacting with the venue store.
#[derive(Debug, Error)]
pub enum VenueStoreError {
    /// The locked read-modify-write of a venue could not be committed.
    /// The transaction was rolled back and the caller may retry.
    #[error("Write conflict on venue {venue}: {reason}")]
    WriteConflict { venue: String, reason: String },

    /// A write violated a store constraint. Retrying will not help.
    #[error("Constraint {constraint} violated for venue {venue}")]
    ConstraintViolation { venue: String, constraint: String },

    /// The store could not be reached.
    #[error("Venue store unavailable: {0}")]
    Unavailable(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl VenueStoreError {
    /// Classifies the error for callers outside the store.
    pub fn kind(&self) -> ErrorKind {
        match self {
            VenueStoreError::WriteConflict { .. } => ErrorKind::WriteConflict,
            VenueStoreError::ConstraintViolation { .. } => ErrorKind::InvalidInput,
            VenueStoreError::Unavailable(_)
            | VenueStoreError::Database(_)
            | VenueStoreError::Migration(_) => ErrorKind::Unavailable,
        }
    }
}

/// Result type for venue store operations.
pub type Result<T> = std::result::Result<T, VenueStoreError>;
