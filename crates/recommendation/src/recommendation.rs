//! Response types returned by the pipeline.

use common::UserId;
use domain::{Price, VenueAvailability};
use serde::{Deserialize, Serialize};

use crate::error::{RecommendationError, Result};
use crate::facts::{Decision, FIELD_RECOMMENDED_TIER, FactDocument};

/// A ticket offer annotated with the decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedOffer {
    pub region_name: String,
    pub tier_level: String,
    pub price: Price,
    /// Price after the decision's discount; equal to `price` for offers
    /// that are not recommended.
    pub discounted_price: Price,
    pub recommended: bool,
}

/// The outcome of one recommendation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub user_id: UserId,
    pub display_name: String,
    pub region: String,
    pub is_sold_out: bool,
    pub is_first_sold_out: bool,
    pub recommended_tier: Option<String>,
    pub discount_percent: u8,
    /// Recommended offer first, the rest by ascending price.
    pub offers: Vec<RecommendedOffer>,
}

impl Recommendation {
    /// Annotates the facts' offers with a decoded decision.
    ///
    /// A decision recommending a tier that is not on offer is malformed.
    /// Exactly one offer is marked recommended and discounted.
    pub fn compose(facts: FactDocument, decision: Decision) -> Result<Self> {
        // A tier listed more than once is recommended at its cheapest offer.
        let recommended_index = match decision.recommended_tier.as_deref() {
            Some(tier) => {
                let index = facts
                    .tickets
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.tier_level == tier)
                    .min_by_key(|(_, t)| t.price)
                    .map(|(i, _)| i);
                if index.is_none() {
                    return Err(RecommendationError::malformed(
                        FIELD_RECOMMENDED_TIER,
                        format!("tier '{tier}' is not offered in {}", facts.user.region),
                    ));
                }
                index
            }
            None => None,
        };

        let mut offers: Vec<RecommendedOffer> = facts
            .tickets
            .into_iter()
            .enumerate()
            .map(|(i, offer)| {
                let recommended = recommended_index == Some(i);
                let discounted_price = if recommended {
                    offer.price.discounted(decision.discount_percent)
                } else {
                    offer.price
                };
                RecommendedOffer {
                    region_name: offer.region_name,
                    tier_level: offer.tier_level,
                    price: offer.price,
                    discounted_price,
                    recommended,
                }
            })
            .collect();
        // Stable, so equal prices keep the upstream order.
        offers.sort_by_key(|o| (!o.recommended, o.price));

        Ok(Self {
            user_id: facts.user.user_id,
            display_name: facts.user.display_name,
            region: facts.user.region,
            is_sold_out: facts.venue.is_sold_out,
            is_first_sold_out: facts.venue.is_first_sold_out,
            recommended_tier: decision.recommended_tier,
            discount_percent: decision.discount_percent,
            offers,
        })
    }

    /// Returns the recommended offer, if the decision picked one.
    pub fn recommended_offer(&self) -> Option<&RecommendedOffer> {
        self.offers.iter().find(|o| o.recommended)
    }
}

/// Whether a region's tickets are only sold online.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnlineTicket {
    pub region_name: String,
    pub is_sold_out: bool,
    pub is_first_sold_out: bool,
    /// True once the venue is sold out.
    pub online_only: bool,
}

impl From<VenueAvailability> for OnlineTicket {
    fn from(venue: VenueAvailability) -> Self {
        Self {
            region_name: venue.name,
            is_sold_out: venue.is_sold_out,
            is_first_sold_out: venue.is_first_sold_out,
            online_only: venue.is_sold_out,
        }
    }
}

#[cfg(test)]
mod tests {
    use common::ErrorKind;
    use domain::{TicketOffer, UserProfile};

    use super::*;

    fn facts(sold_out: bool) -> FactDocument {
        FactDocument {
            user: UserProfile::new(UserId::new(1), "Budi Santoso", "Jakarta"),
            venue: VenueAvailability {
                name: "Jakarta".to_string(),
                is_sold_out: sold_out,
                is_first_sold_out: sold_out,
                known: true,
            },
            tickets: vec![
                TicketOffer::new("Jakarta", "VIP", Price::from_minor_units(500_000)),
                TicketOffer::new("Jakarta", "Regular", Price::from_minor_units(150_000)),
                TicketOffer::new("Jakarta", "Online", Price::from_minor_units(100_000)),
            ],
        }
    }

    fn decision(tier: Option<&str>, discount: u8) -> Decision {
        Decision {
            recommended_tier: tier.map(str::to_string),
            discount_percent: discount,
        }
    }

    #[test]
    fn recommended_offer_comes_first_with_discount() {
        let rec = Recommendation::compose(facts(true), decision(Some("Regular"), 10)).unwrap();

        let tiers: Vec<_> = rec.offers.iter().map(|o| o.tier_level.as_str()).collect();
        assert_eq!(tiers, vec!["Regular", "Online", "VIP"]);

        let recommended = rec.recommended_offer().unwrap();
        assert_eq!(recommended.price, Price::from_minor_units(150_000));
        assert_eq!(recommended.discounted_price, Price::from_minor_units(135_000));
        assert!(rec.offers[1..].iter().all(|o| o.discounted_price == o.price));
        assert!(rec.is_sold_out);
    }

    #[test]
    fn duplicate_tier_discounts_only_cheapest_listing() {
        let mut facts = facts(true);
        facts.tickets.insert(
            0,
            TicketOffer::new("Jakarta", "Online", Price::from_minor_units(120_000)),
        );

        let rec = Recommendation::compose(facts, decision(Some("Online"), 10)).unwrap();

        assert_eq!(rec.offers.iter().filter(|o| o.recommended).count(), 1);
        let recommended = rec.recommended_offer().unwrap();
        assert_eq!(recommended.price, Price::from_minor_units(100_000));
        assert_eq!(recommended.discounted_price, Price::from_minor_units(90_000));

        let other = rec
            .offers
            .iter()
            .find(|o| o.tier_level == "Online" && !o.recommended)
            .unwrap();
        assert_eq!(other.discounted_price, other.price);
    }

    #[test]
    fn no_tier_leaves_offers_unannotated() {
        let rec = Recommendation::compose(facts(false), decision(None, 0)).unwrap();

        assert!(rec.recommended_offer().is_none());
        assert_eq!(rec.offers.len(), 3);
        assert_eq!(rec.offers[0].tier_level, "Online");
    }

    #[test]
    fn unknown_tier_is_malformed() {
        let err = Recommendation::compose(facts(false), decision(Some("Balcony"), 0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecisionMalformed);
        assert!(err.to_string().contains("Balcony"));
    }

    #[test]
    fn online_only_follows_sold_out() {
        let mut venue = VenueAvailability::unknown("Jakarta");
        assert!(!OnlineTicket::from(venue.clone()).online_only);

        venue.is_sold_out = true;
        let online = OnlineTicket::from(venue);
        assert!(online.online_only);
        assert_eq!(online.region_name, "Jakarta");
    }
}
