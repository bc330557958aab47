//! Orchestration of a recommendation request.

use std::time::{Duration, Instant};

use common::UserId;
use domain::validation::{validate_name, validate_user_id};
use domain::VenueStateManager;
use venue_store::VenueStore;

use crate::error::{RecommendationError, Result};
use crate::evaluator::RuleEvaluator;
use crate::facts::{Decision, FactDocument};
use crate::recommendation::{OnlineTicket, Recommendation};
use crate::services::{ProfileService, TicketService};

/// Builds recommendations from the profile, venue and ticket sources.
///
/// The profile is resolved first since it supplies the region. Venue state
/// and ticket offers are then fetched concurrently and both must succeed
/// before the evaluator runs. A missing venue counts as available; a
/// missing profile fails the request.
///
/// With a request timeout set, the whole pipeline runs under one deadline.
/// When it passes, every in-flight upstream call is dropped and the request
/// fails with `Cancelled`.
pub struct RecommendationPipeline<S, P, T, E>
where
    S: VenueStore,
    P: ProfileService,
    T: TicketService,
    E: RuleEvaluator,
{
    venues: VenueStateManager<S>,
    profiles: P,
    tickets: T,
    evaluator: E,
    request_timeout: Option<Duration>,
}

impl<S, P, T, E> RecommendationPipeline<S, P, T, E>
where
    S: VenueStore,
    P: ProfileService,
    T: TicketService,
    E: RuleEvaluator,
{
    /// Creates a pipeline with no request deadline.
    pub fn new(venues: VenueStateManager<S>, profiles: P, tickets: T, evaluator: E) -> Self {
        Self {
            venues,
            profiles,
            tickets,
            evaluator,
            request_timeout: None,
        }
    }

    /// Bounds every request by `timeout`.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Returns the venue state manager the pipeline reads from.
    pub fn venues(&self) -> &VenueStateManager<S> {
        &self.venues
    }

    /// Builds a recommendation for `user_id`.
    #[tracing::instrument(skip(self))]
    pub async fn get_recommendation(&self, user_id: UserId) -> Result<Recommendation> {
        metrics::counter!("recommendation_requests_total").increment(1);
        let start = Instant::now();

        let result = self
            .with_deadline("get_recommendation", self.recommend(user_id))
            .await;

        metrics::histogram!("recommendation_duration_seconds")
            .record(start.elapsed().as_secs_f64());
        match &result {
            Ok(rec) => tracing::info!(
                %user_id,
                region = %rec.region,
                tier = ?rec.recommended_tier,
                offers = rec.offers.len(),
                "recommendation built"
            ),
            Err(e) => {
                metrics::counter!("recommendation_failures_total", "kind" => e.kind().code())
                    .increment(1);
                tracing::warn!(%user_id, error = %e, "recommendation failed");
            }
        }
        result
    }

    /// Reports whether tickets for `region_name` are only sold online.
    #[tracing::instrument(skip(self))]
    pub async fn get_online_ticket(&self, region_name: &str) -> Result<OnlineTicket> {
        let venue = self
            .with_deadline("get_online_ticket", async {
                self.venues
                    .availability(region_name)
                    .await
                    .map_err(RecommendationError::from)
            })
            .await?;
        Ok(OnlineTicket::from(venue))
    }

    async fn recommend(&self, user_id: UserId) -> Result<Recommendation> {
        let user_id = validate_user_id(user_id)?;

        let profile = self.profiles.find_user_profile(user_id).await?;
        let region = validate_name("region", &profile.region)
            .map_err(|e| {
                tracing::warn!(%user_id, error = %e, "profile has no usable region");
                RecommendationError::NotFound {
                    service: "profile service",
                    operation: "resolve_region",
                    key: user_id.to_string(),
                }
            })?
            .to_string();

        let (venue, tickets) = tokio::try_join!(
            async {
                self.venues
                    .availability(&region)
                    .await
                    .map_err(RecommendationError::from)
            },
            self.tickets.find_tickets_by_region(&region),
        )?;
        tracing::debug!(
            region = %region,
            sold_out = venue.is_sold_out,
            offers = tickets.len(),
            "facts resolved"
        );

        let facts = FactDocument {
            user: profile,
            venue,
            tickets,
        };
        let document = self.evaluator.evaluate(&facts.to_value()?)?;
        let decision = Decision::decode(&document)?;
        Recommendation::compose(facts, decision)
    }

    async fn with_deadline<R>(
        &self,
        operation: &'static str,
        work: impl Future<Output = Result<R>>,
    ) -> Result<R> {
        let Some(timeout) = self.request_timeout else {
            return work.await;
        };
        tokio::time::timeout(timeout, work)
            .await
            .unwrap_or_else(|_| {
                Err(RecommendationError::Cancelled {
                    operation,
                    timeout_ms: timeout.as_millis(),
                })
            })
    }
}
