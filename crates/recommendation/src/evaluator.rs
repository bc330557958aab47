//! The rule evaluator contract and the bundled discount policy.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::facts::{FIELD_DISCOUNT_PERCENT, FIELD_RECOMMENDED_TIER};

/// Raised by an evaluator that cannot digest the facts it was given.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct EvaluationError(String);

impl EvaluationError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Decision function applied to a fact document.
///
/// Treated as pure: no side effects, same output for the same facts and
/// rule version. The pipeline only relies on the decision fields it
/// decodes; anything else in the output is ignored.
pub trait RuleEvaluator: Send + Sync {
    fn evaluate(&self, facts: &Value) -> Result<Value, EvaluationError>;
}

impl<T: RuleEvaluator + ?Sized> RuleEvaluator for Arc<T> {
    fn evaluate(&self, facts: &Value) -> Result<Value, EvaluationError> {
        (**self).evaluate(facts)
    }
}

/// Adapts a closure into a [`RuleEvaluator`].
#[derive(Clone)]
pub struct FnEvaluator<F>(pub F);

impl<F> RuleEvaluator for FnEvaluator<F>
where
    F: Fn(&Value) -> Result<Value, EvaluationError> + Send + Sync,
{
    fn evaluate(&self, facts: &Value) -> Result<Value, EvaluationError> {
        (self.0)(facts)
    }
}

/// Tier that stays on sale once a venue is sold out.
pub const ONLINE_TIER: &str = "Online";

#[derive(Debug, Deserialize)]
struct PolicyFacts {
    venue: PolicyVenue,
    tickets: Vec<PolicyTicket>,
}

#[derive(Debug, Deserialize)]
struct PolicyVenue {
    is_sold_out: bool,
}

#[derive(Debug, Deserialize)]
struct PolicyTicket {
    tier_level: String,
    price: i64,
}

/// Fixed discount policy used when no external rule engine is wired in.
///
/// - no offers: no tier, no discount
/// - venue sold out: the online tier (else the cheapest) at the configured discount
/// - otherwise: the cheapest tier at full price
#[derive(Debug, Clone)]
pub struct DiscountPolicyEvaluator {
    sold_out_discount_percent: u8,
    online_tier: String,
}

impl DiscountPolicyEvaluator {
    /// Creates the policy; percentages above 100 are clamped.
    pub fn new(sold_out_discount_percent: u8) -> Self {
        Self {
            sold_out_discount_percent: sold_out_discount_percent.min(100),
            online_tier: ONLINE_TIER.to_string(),
        }
    }

    /// Overrides the tier preferred for sold-out venues.
    pub fn with_online_tier(mut self, tier: impl Into<String>) -> Self {
        self.online_tier = tier.into();
        self
    }
}

impl Default for DiscountPolicyEvaluator {
    fn default() -> Self {
        Self::new(10)
    }
}

impl RuleEvaluator for DiscountPolicyEvaluator {
    fn evaluate(&self, facts: &Value) -> Result<Value, EvaluationError> {
        let facts = PolicyFacts::deserialize(facts)
            .map_err(|e| EvaluationError::new(format!("facts do not fit the discount policy: {e}")))?;

        // Ties on price go to the first offer listed.
        let cheapest = facts
            .tickets
            .iter()
            .min_by_key(|t| t.price)
            .map(|t| t.tier_level.as_str());

        let (rule, tier, discount) = match cheapest {
            None => ("no_offers", None, 0),
            Some(cheapest) if facts.venue.is_sold_out => {
                let online = facts
                    .tickets
                    .iter()
                    .find(|t| t.tier_level == self.online_tier)
                    .map(|t| t.tier_level.as_str());
                (
                    "sold_out_online",
                    Some(online.unwrap_or(cheapest)),
                    self.sold_out_discount_percent,
                )
            }
            Some(cheapest) => ("cheapest_available", Some(cheapest), 0),
        };

        Ok(json!({
            FIELD_RECOMMENDED_TIER: tier,
            FIELD_DISCOUNT_PERCENT: discount,
            "rule": rule,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts(sold_out: bool, tickets: Value) -> Value {
        json!({
            "user": { "user_id": 1, "display_name": "Budi", "region": "Jakarta" },
            "venue": { "name": "Jakarta", "is_sold_out": sold_out, "is_first_sold_out": sold_out, "known": true },
            "tickets": tickets,
        })
    }

    #[test]
    fn test_no_offers_recommends_nothing() {
        let decision = DiscountPolicyEvaluator::new(10)
            .evaluate(&facts(true, json!([])))
            .unwrap();
        assert_eq!(decision[FIELD_RECOMMENDED_TIER], Value::Null);
        assert_eq!(decision[FIELD_DISCOUNT_PERCENT], 0);
    }

    #[test]
    fn test_available_venue_gets_cheapest_at_full_price() {
        let tickets = json!([
            { "region_name": "Jakarta", "tier_level": "VIP", "price": 500000 },
            { "region_name": "Jakarta", "tier_level": "Regular", "price": 150000 },
        ]);
        let decision = DiscountPolicyEvaluator::new(10)
            .evaluate(&facts(false, tickets))
            .unwrap();
        assert_eq!(decision[FIELD_RECOMMENDED_TIER], "Regular");
        assert_eq!(decision[FIELD_DISCOUNT_PERCENT], 0);
        assert_eq!(decision["rule"], "cheapest_available");
    }

    #[test]
    fn test_sold_out_venue_prefers_online_with_discount() {
        let tickets = json!([
            { "region_name": "Jakarta", "tier_level": "Regular", "price": 50000 },
            { "region_name": "Jakarta", "tier_level": "Online", "price": 100000 },
        ]);
        let decision = DiscountPolicyEvaluator::new(15)
            .evaluate(&facts(true, tickets))
            .unwrap();
        assert_eq!(decision[FIELD_RECOMMENDED_TIER], "Online");
        assert_eq!(decision[FIELD_DISCOUNT_PERCENT], 15);
    }

    #[test]
    fn test_sold_out_without_online_tier_falls_back_to_cheapest() {
        let tickets = json!([
            { "region_name": "Jakarta", "tier_level": "VIP", "price": 500000 },
            { "region_name": "Jakarta", "tier_level": "Regular", "price": 150000 },
        ]);
        let decision = DiscountPolicyEvaluator::default()
            .evaluate(&facts(true, tickets))
            .unwrap();
        assert_eq!(decision[FIELD_RECOMMENDED_TIER], "Regular");
        assert_eq!(decision[FIELD_DISCOUNT_PERCENT], 10);
    }

    #[test]
    fn test_facts_without_venue_are_rejected() {
        let result = DiscountPolicyEvaluator::default().evaluate(&json!({ "tickets": [] }));
        assert!(result.is_err());
    }

    #[test]
    fn test_closures_can_stand_in_for_an_engine() {
        let evaluator = FnEvaluator(|_: &Value| {
            Ok::<_, EvaluationError>(json!({ "recommended_tier": null }))
        });
        let decision = evaluator.evaluate(&json!({})).unwrap();
        assert!(decision.get(FIELD_DISCOUNT_PERCENT).is_none());
    }
}
