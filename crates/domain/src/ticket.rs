//! Ticket tiers offered in a region.

use serde::{Deserialize, Serialize};

/// Price in the smallest currency unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// Creates a price from an amount in the smallest currency unit.
    pub fn from_minor_units(amount: i64) -> Self {
        Self(amount)
    }

    /// Returns zero.
    pub fn zero() -> Self {
        Self(0)
    }

    /// Returns the amount in the smallest currency unit.
    pub fn minor_units(&self) -> i64 {
        self.0
    }

    /// Returns the price after taking `percent` off, rounding the discount
    /// down to a whole unit. Percentages above 100 are clamped.
    pub fn discounted(&self, percent: u8) -> Price {
        let percent = i128::from(percent.min(100));
        let off = i128::from(self.0) * percent / 100;
        // |off| <= |self.0|, so the difference always fits back into i64.
        Price((i128::from(self.0) - off) as i64)
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One priced ticket tier for a region, e.g. "Online" or "VIP".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketOffer {
    pub region_name: String,
    pub tier_level: String,
    pub price: Price,
}

impl TicketOffer {
    /// Creates a new ticket offer.
    pub fn new(region_name: impl Into<String>, tier_level: impl Into<String>, price: Price) -> Self {
        Self {
            region_name: region_name.into(),
            tier_level: tier_level.into(),
            price,
        }
    }
}
