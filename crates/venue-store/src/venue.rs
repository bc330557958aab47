use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::VenueId;

/// A venue tracked for sell-out status.
///
/// `name` is the unique, case-sensitive key. Venues are created the first
/// time a sold-out status is recorded for an unseen name and are never
/// hard-deleted here; `deleted_at` is owned by whoever soft-deletes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
    pub id: VenueId,
    pub name: String,
    pub is_sold_out: bool,
    pub is_first_sold_out: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Venue {
    /// Returns the sell-out flags of this venue.
    pub fn flags(&self) -> SoldOutFlags {
        SoldOutFlags {
            is_sold_out: self.is_sold_out,
            is_first_sold_out: self.is_first_sold_out,
        }
    }

    /// Returns true if the venue has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// The two sell-out flags of a venue.
///
/// `is_first_sold_out` is sticky: once set it survives every later
/// transition, including a venue going back on sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SoldOutFlags {
    pub is_sold_out: bool,
    pub is_first_sold_out: bool,
}

impl SoldOutFlags {
    /// Flags for a venue observed for the first time.
    ///
    /// The first observation counts as the first sell-out when it is one.
    pub fn initial(sold_out: bool) -> Self {
        Self {
            is_sold_out: sold_out,
            is_first_sold_out: sold_out,
        }
    }

    /// Flags after recording `sold_out` on top of the current flags.
    pub fn apply(self, sold_out: bool) -> Self {
        Self {
            is_sold_out: sold_out,
            is_first_sold_out: self.is_first_sold_out || (sold_out && !self.is_sold_out),
        }
    }

    /// Computes the next flags from the locked prior state, if any.
    pub fn next(prior: Option<SoldOutFlags>, sold_out: bool) -> Self {
        match prior {
            Some(flags) => flags.apply(sold_out),
            None => Self::initial(sold_out),
        }
    }
}
