//! Commands that record a venue's sold-out status.

use serde::{Deserialize, Serialize};

/// A request that ends in a locked sold-out write.
///
/// Both concrete commands funnel into the same state-machine operation;
/// they differ only in where they come from.
pub trait SoldOutCommand: Send + Sync + std::fmt::Debug {
    /// Name used in logs and metrics.
    const NAME: &'static str;

    /// The venue to update.
    fn venue_name(&self) -> &str;

    /// The sold-out status to record.
    fn is_sold_out(&self) -> bool;
}

/// Ticket sales report that a venue has (or no longer has) tickets left.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketSoldOut {
    pub venue_name: String,
    pub is_sold_out: bool,
}

impl TicketSoldOut {
    /// Creates a new command.
    pub fn new(venue_name: impl Into<String>, is_sold_out: bool) -> Self {
        Self {
            venue_name: venue_name.into(),
            is_sold_out,
        }
    }
}

impl SoldOutCommand for TicketSoldOut {
    const NAME: &'static str = "update_ticket_sold_out";

    fn venue_name(&self) -> &str {
        &self.venue_name
    }

    fn is_sold_out(&self) -> bool {
        self.is_sold_out
    }
}

/// Operator-driven status change for a venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateVenueStatus {
    pub venue_name: String,
    pub is_sold_out: bool,
}

impl UpdateVenueStatus {
    /// Creates a new command.
    pub fn new(venue_name: impl Into<String>, is_sold_out: bool) -> Self {
        Self {
            venue_name: venue_name.into(),
            is_sold_out,
        }
    }
}

impl SoldOutCommand for UpdateVenueStatus {
    const NAME: &'static str = "update_venue_status";

    fn venue_name(&self) -> &str {
        &self.venue_name
    }

    fn is_sold_out(&self) -> bool {
        self.is_sold_out
    }
}
