//! Fact documents handed to the rule evaluator and the decisions read back.

use domain::{TicketOffer, UserProfile, VenueAvailability};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{RecommendationError, Result};

/// Decision field naming the tier to recommend, a string or null.
pub const FIELD_RECOMMENDED_TIER: &str = "recommended_tier";
/// Decision field holding the discount as a whole percentage, 0 to 100.
pub const FIELD_DISCOUNT_PERCENT: &str = "discount_percent";

/// Everything known about one recommendation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactDocument {
    pub user: UserProfile,
    pub venue: VenueAvailability,
    pub tickets: Vec<TicketOffer>,
}

impl FactDocument {
    /// Renders the facts as the JSON document evaluators consume.
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self)
            .map_err(|e| RecommendationError::malformed("<facts>", format!("facts not representable: {e}")))
    }
}

/// The fields of a decision document the pipeline acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub recommended_tier: Option<String>,
    pub discount_percent: u8,
}

impl Decision {
    /// Decodes a decision document.
    ///
    /// Both fields must be present; `recommended_tier` may be null but not
    /// absent. Unknown fields are ignored. Fails on the first field that is
    /// missing or mistyped, naming it.
    pub fn decode(document: &Value) -> Result<Self> {
        let fields = document.as_object().ok_or_else(|| {
            RecommendationError::malformed(
                "<decision>",
                format!("expected an object, got {}", type_name(document)),
            )
        })?;

        let recommended_tier = match required(fields, FIELD_RECOMMENDED_TIER)? {
            Value::Null => None,
            Value::String(tier) if !tier.trim().is_empty() => Some(tier.clone()),
            Value::String(_) => {
                return Err(RecommendationError::malformed(
                    FIELD_RECOMMENDED_TIER,
                    "tier name is blank",
                ));
            }
            other => {
                return Err(RecommendationError::malformed(
                    FIELD_RECOMMENDED_TIER,
                    format!("expected a string or null, got {}", type_name(other)),
                ));
            }
        };

        let discount = required(fields, FIELD_DISCOUNT_PERCENT)?;
        let discount_percent = discount
            .as_u64()
            .filter(|percent| *percent <= 100)
            .and_then(|percent| u8::try_from(percent).ok())
            .ok_or_else(|| {
                RecommendationError::malformed(
                    FIELD_DISCOUNT_PERCENT,
                    format!("expected an integer from 0 to 100, got {discount}"),
                )
            })?;

        Ok(Self {
            recommended_tier,
            discount_percent,
        })
    }
}

fn required<'a>(fields: &'a Map<String, Value>, field: &str) -> Result<&'a Value> {
    fields
        .get(field)
        .ok_or_else(|| RecommendationError::malformed(field, "field is missing"))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
