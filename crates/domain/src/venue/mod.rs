//! Venue sell-out state and the commands that change it.

mod commands;
mod manager;

pub use commands::{SoldOutCommand, TicketSoldOut, UpdateVenueStatus};
pub use manager::VenueStateManager;

use serde::{Deserialize, Serialize};
use venue_store::Venue;

/// Sell-out state of a venue as used when recommending tickets.
///
/// A venue the store has never heard of is reported as available, with
/// `known` set to false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueAvailability {
    pub name: String,
    pub is_sold_out: bool,
    pub is_first_sold_out: bool,
    pub known: bool,
}

impl VenueAvailability {
    /// Default state for a venue with no record.
    pub fn unknown(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_sold_out: false,
            is_first_sold_out: false,
            known: false,
        }
    }
}

impl From<Venue> for VenueAvailability {
    fn from(venue: Venue) -> Self {
        Self {
            name: venue.name,
            is_sold_out: venue.is_sold_out,
            is_first_sold_out: venue.is_first_sold_out,
            known: true,
        }
    }
}
