//! Shared application state and its wiring.

use std::sync::Arc;
use std::time::Duration;

use domain::VenueStateManager;
use recommendation::services::build_client;
use recommendation::{
    DiscountPolicyEvaluator, HttpProfileService, HttpTicketService, HttpTokenValidator,
    InMemoryProfileService, InMemoryTicketService, InMemoryTokenValidator, ProfileService,
    RecommendationPipeline, RuleEvaluator, TicketService, TokenValidator,
};
use venue_store::VenueStore;

use crate::config::Config;

/// Venue store as held by the application.
pub type SharedVenueStore = Arc<dyn VenueStore>;

/// The pipeline with every collaborator behind a trait object.
pub type Pipeline = RecommendationPipeline<
    SharedVenueStore,
    Arc<dyn ProfileService>,
    Arc<dyn TicketService>,
    Arc<dyn RuleEvaluator>,
>;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub venues: VenueStateManager<SharedVenueStore>,
    pub pipeline: Pipeline,
    pub tokens: Arc<dyn TokenValidator>,
}

impl AppState {
    /// Wires the state from explicitly constructed collaborators.
    pub fn new(
        store: SharedVenueStore,
        profiles: Arc<dyn ProfileService>,
        tickets: Arc<dyn TicketService>,
        tokens: Arc<dyn TokenValidator>,
        evaluator: Arc<dyn RuleEvaluator>,
        request_timeout: Duration,
    ) -> Self {
        let venues = VenueStateManager::new(store);
        let pipeline = RecommendationPipeline::new(venues.clone(), profiles, tickets, evaluator)
            .with_request_timeout(request_timeout);
        Self {
            venues,
            pipeline,
            tokens,
        }
    }
}

/// In-memory upstream services, kept so callers can seed them.
#[derive(Debug, Clone, Default)]
pub struct InMemoryServices {
    pub profiles: InMemoryProfileService,
    pub tickets: InMemoryTicketService,
    pub tokens: InMemoryTokenValidator,
}

/// Creates state backed by in-memory upstream services.
pub fn create_default_state(store: SharedVenueStore) -> (Arc<AppState>, InMemoryServices) {
    let services = InMemoryServices::default();
    let config = Config::default();
    let state = AppState::new(
        store,
        Arc::new(services.profiles.clone()),
        Arc::new(services.tickets.clone()),
        Arc::new(services.tokens.clone()),
        Arc::new(DiscountPolicyEvaluator::new(config.sold_out_discount_percent)),
        config.request_timeout,
    );
    (Arc::new(state), services)
}

/// Creates state from configuration, using the HTTP adapters for every
/// upstream with a configured URL and in-memory services otherwise.
pub fn build_state(config: &Config, store: SharedVenueStore) -> reqwest::Result<Arc<AppState>> {
    let client = build_client(config.upstream_timeout)?;
    let fallback = InMemoryServices::default();

    let (profiles, tokens): (Arc<dyn ProfileService>, Arc<dyn TokenValidator>) =
        match &config.user_service_url {
            Some(url) => (
                Arc::new(HttpProfileService::new(client.clone(), url.as_str())),
                Arc::new(HttpTokenValidator::new(client.clone(), url.as_str())),
            ),
            None => {
                tracing::warn!("USER_SERVICE_URL not set, no token will be accepted");
                (Arc::new(fallback.profiles), Arc::new(fallback.tokens))
            }
        };

    let tickets: Arc<dyn TicketService> = match &config.ticket_service_url {
        Some(url) => Arc::new(HttpTicketService::new(client, url.as_str())),
        None => {
            tracing::warn!("TICKET_SERVICE_URL not set, every region has no offers");
            Arc::new(fallback.tickets)
        }
    };

    let evaluator = DiscountPolicyEvaluator::new(config.sold_out_discount_percent);
    Ok(Arc::new(AppState::new(
        store,
        profiles,
        tickets,
        tokens,
        Arc::new(evaluator),
        config.request_timeout,
    )))
}
