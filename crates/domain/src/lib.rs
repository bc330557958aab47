//! Domain layer for the ticket recommendation service.
//!
//! This crate provides:
//! - [`VenueStateManager`], the only writer of venue sell-out state
//! - The sold-out commands accepted from callers
//! - Read-only projections of upstream data: [`UserProfile`], [`TicketOffer`]

pub mod error;
pub mod profile;
pub mod ticket;
pub mod validation;
pub mod venue;

pub use error::DomainError;
pub use profile::UserProfile;
pub use ticket::{Price, TicketOffer};
pub use venue::{
    SoldOutCommand, TicketSoldOut, UpdateVenueStatus, VenueAvailability, VenueStateManager,
};
