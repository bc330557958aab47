//! Owner of the venue sell-out state machine.

use venue_store::{SoldOutUpdate, Venue, VenueStore};

use super::{SoldOutCommand, TicketSoldOut, UpdateVenueStatus, VenueAvailability};
use crate::error::DomainError;
use crate::validation::validate_name;

/// Reads venue state and performs every write to it.
///
/// Writes go through the store's locked read-modify-write, so concurrent
/// updates of one venue serialize and the first-sold-out flag is set by
/// exactly one of them.
#[derive(Clone)]
pub struct VenueStateManager<S: VenueStore> {
    store: S,
}

impl<S: VenueStore> VenueStateManager<S> {
    /// Creates a new manager over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads a venue by name, failing with `VenueNotFound` if absent.
    #[tracing::instrument(skip(self))]
    pub async fn get_venue(&self, name: &str) -> Result<Venue, DomainError> {
        self.find_venue(name)
            .await?
            .ok_or_else(|| DomainError::VenueNotFound(name.to_string()))
    }

    /// Loads a venue by name, returning None if absent.
    pub async fn find_venue(&self, name: &str) -> Result<Option<Venue>, DomainError> {
        let name = validate_name("venue_name", name)?;
        self.store
            .find_by_name(name)
            .await
            .map_err(|e| DomainError::store("find_venue", name, e))
    }

    /// Returns the sell-out state of a venue, defaulting to available when
    /// the venue has no record.
    #[tracing::instrument(skip(self))]
    pub async fn availability(&self, name: &str) -> Result<VenueAvailability, DomainError> {
        match self.find_venue(name).await? {
            Some(venue) => Ok(venue.into()),
            None => {
                tracing::debug!(venue = %name, "venue not found, treating as available");
                Ok(VenueAvailability::unknown(name))
            }
        }
    }

    /// Lists all live venues ordered by name.
    #[tracing::instrument(skip(self))]
    pub async fn list_venues(&self) -> Result<Vec<Venue>, DomainError> {
        self.store
            .list()
            .await
            .map_err(|e| DomainError::store("list_venues", "*", e))
    }

    /// Records a sold-out status for a venue.
    ///
    /// Creates the venue on first sight. Repeating the same status is a
    /// no-op on the flags; `is_first_sold_out` is set only by the write
    /// that first takes an available venue to sold out.
    #[tracing::instrument(skip(self))]
    pub async fn set_sold_out(
        &self,
        name: &str,
        sold_out: bool,
    ) -> Result<SoldOutUpdate, DomainError> {
        let name = validate_name("venue_name", name)?;

        let update = self.store.set_sold_out(name, sold_out).await.map_err(|e| {
            metrics::counter!("venue_sold_out_failures_total", "kind" => e.kind().code())
                .increment(1);
            tracing::warn!(venue = %name, error = %e, "sold-out update failed");
            DomainError::store("set_sold_out", name, e)
        })?;

        metrics::counter!("venue_sold_out_updates_total").increment(1);
        if update.created() {
            tracing::info!(venue = %name, sold_out, "venue created");
        }
        if update.first_sold_out_triggered() {
            metrics::counter!("venue_first_sold_out_total").increment(1);
            tracing::info!(venue = %name, venue_id = %update.venue.id, "venue sold out for the first time");
        } else if update.changed() {
            tracing::info!(venue = %name, sold_out, "venue sell-out status changed");
        }

        Ok(update)
    }

    /// Applies a sold-out command.
    pub async fn apply<C: SoldOutCommand>(&self, cmd: &C) -> Result<SoldOutUpdate, DomainError> {
        tracing::debug!(command = C::NAME, ?cmd, "applying sold-out command");
        self.set_sold_out(cmd.venue_name(), cmd.is_sold_out()).await
    }

    /// Records a sold-out report from ticket sales.
    #[tracing::instrument(skip(self))]
    pub async fn update_ticket_sold_out(&self, cmd: TicketSoldOut) -> Result<(), DomainError> {
        self.apply(&cmd).await.map(|_| ())
    }

    /// Records an operator status change and returns the committed venue.
    #[tracing::instrument(skip(self))]
    pub async fn update_venue_status(&self, cmd: UpdateVenueStatus) -> Result<Venue, DomainError> {
        self.apply(&cmd).await.map(|update| update.venue)
    }
}
