//! Ticket service trait, HTTP adapter and in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use domain::{Price, TicketOffer};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::RwLock;

use super::http::{self, Call};
use crate::error::{RecommendationError, Result};

const SERVICE: &str = "ticket service";
const TICKET_PATH: &str = "/api/private/ticket";

/// Lists the ticket tiers on sale in a region.
#[async_trait]
pub trait TicketService: Send + Sync {
    /// Returns the offers for `region_name`. An empty list is a valid answer.
    async fn find_tickets_by_region(&self, region_name: &str) -> Result<Vec<TicketOffer>>;
}

#[async_trait]
impl<T: TicketService + ?Sized> TicketService for Arc<T> {
    async fn find_tickets_by_region(&self, region_name: &str) -> Result<Vec<TicketOffer>> {
        (**self).find_tickets_by_region(region_name).await
    }
}

#[derive(Debug, Deserialize)]
struct TicketPayload {
    region_name: String,
    level: String,
    price: i64,
}

impl From<TicketPayload> for TicketOffer {
    fn from(payload: TicketPayload) -> Self {
        TicketOffer::new(
            payload.region_name,
            payload.level,
            Price::from_minor_units(payload.price),
        )
    }
}

/// Ticket service backed by the ticketing service's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpTicketService {
    client: Client,
    base_url: String,
}

impl HttpTicketService {
    /// Creates an adapter that calls the service at `base_url`.
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl TicketService for HttpTicketService {
    #[tracing::instrument(skip(self), fields(service = SERVICE))]
    async fn find_tickets_by_region(&self, region_name: &str) -> Result<Vec<TicketOffer>> {
        let call = Call {
            service: SERVICE,
            operation: "find_tickets_by_region",
            key: region_name,
        };
        let url = http::endpoint(&self.base_url, TICKET_PATH);

        // The service encodes "no tiers" as `"data": null`; the key itself is required.
        let payload: Option<Vec<TicketPayload>> =
            http::get_data(&self.client, &url, &[("region_name", region_name)], call).await?;

        let offers: Vec<TicketOffer> = payload
            .unwrap_or_default()
            .into_iter()
            .map(TicketOffer::from)
            .collect();
        tracing::debug!(region = %region_name, offers = offers.len(), "tickets resolved");
        Ok(offers)
    }
}

/// In-memory ticket service for testing and local runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTicketService {
    offers: Arc<RwLock<HashMap<String, Vec<TicketOffer>>>>,
    unavailable: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
    delay: Option<Duration>,
}

impl InMemoryTicketService {
    /// Creates a new ticket service with no offers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every lookup, for exercising request deadlines.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Adds an offer to its region.
    pub async fn insert(&self, offer: TicketOffer) {
        self.offers
            .write()
            .await
            .entry(offer.region_name.clone())
            .or_default()
            .push(offer);
    }

    /// Configures the service to fail every lookup with `Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Returns the number of lookups received.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TicketService for InMemoryTicketService {
    async fn find_tickets_by_region(&self, region_name: &str) -> Result<Vec<TicketOffer>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RecommendationError::unavailable(
                SERVICE,
                "find_tickets_by_region",
                region_name,
                "in-memory service switched off",
            ));
        }

        Ok(self
            .offers
            .read()
            .await
            .get(region_name)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use common::ErrorKind;

    use super::*;

    #[tokio::test]
    async fn test_returns_offers_for_region_only() {
        let service = InMemoryTicketService::new();
        service
            .insert(TicketOffer::new("Jakarta", "Online", Price::from_minor_units(100_000)))
            .await;
        service
            .insert(TicketOffer::new("Jakarta", "VIP", Price::from_minor_units(500_000)))
            .await;
        service
            .insert(TicketOffer::new("Bali", "Online", Price::from_minor_units(80_000)))
            .await;

        let offers = service.find_tickets_by_region("Jakarta").await.unwrap();
        assert_eq!(offers.len(), 2);
        assert!(offers.iter().all(|o| o.region_name == "Jakarta"));
    }

    #[tokio::test]
    async fn test_unknown_region_has_no_offers() {
        let service = InMemoryTicketService::new();

        let offers = service.find_tickets_by_region("Nowhere").await.unwrap();
        assert!(offers.is_empty());
        assert_eq!(service.call_count(), 1);
    }

    #[tokio::test]
    async fn test_unavailable_service_fails_lookups() {
        let service = InMemoryTicketService::new();
        service.set_unavailable(true);

        let err = service.find_tickets_by_region("Jakarta").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unavailable);
    }

    #[test]
    fn test_payload_maps_level_to_tier() {
        let payload: TicketPayload = serde_json::from_value(serde_json::json!({
            "region_name": "Jakarta",
            "level": "Online",
            "price": 100000
        }))
        .unwrap();

        let offer = TicketOffer::from(payload);
        assert_eq!(offer.tier_level, "Online");
        assert_eq!(offer.price, Price::from_minor_units(100_000));
    }
}
