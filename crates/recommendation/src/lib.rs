//! Recommendation pipeline for the ticket recommendation service.
//!
//! A recommendation is built in four stages:
//! 1. Resolve the user's profile (and with it, their region)
//! 2. Resolve the region's venue state and ticket offers concurrently
//! 3. Hand the assembled facts to a [`RuleEvaluator`]
//! 4. Decode the decision and shape the offers
//!
//! Upstream services sit behind the traits in [`services`], each with an
//! HTTP adapter and an in-memory twin for tests and local runs.

pub mod error;
pub mod evaluator;
pub mod facts;
pub mod pipeline;
pub mod recommendation;
pub mod services;

pub use error::{RecommendationError, Result};
pub use evaluator::{DiscountPolicyEvaluator, EvaluationError, FnEvaluator, RuleEvaluator};
pub use facts::{Decision, FactDocument};
pub use pipeline::RecommendationPipeline;
pub use recommendation::{OnlineTicket, Recommendation, RecommendedOffer};
pub use services::{
    HttpProfileService, HttpTicketService, HttpTokenValidator, InMemoryProfileService,
    InMemoryTicketService, InMemoryTokenValidator, ProfileService, TicketService, TokenClaims,
    TokenValidator,
};
