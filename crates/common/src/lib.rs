//! Shared types for the ticket recommendation service.

pub mod kind;
pub mod types;

pub use kind::ErrorKind;
pub use types::{UserId, VenueId};
