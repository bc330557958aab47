use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::{Result, SoldOutFlags, Venue};

/// Outcome of a locked sold-out write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SoldOutUpdate {
    /// The venue as committed.
    pub venue: Venue,
    /// Flags read under the row lock, or None if the venue was created.
    pub previous: Option<SoldOutFlags>,
}

impl SoldOutUpdate {
    /// Returns true if this write created the venue.
    pub fn created(&self) -> bool {
        self.previous.is_none()
    }

    /// Returns true if this write is the one that set `is_first_sold_out`.
    ///
    /// Exactly one write per venue can ever observe this.
    pub fn first_sold_out_triggered(&self) -> bool {
        let was_first = self.previous.is_some_and(|p| p.is_first_sold_out);
        self.venue.is_first_sold_out && !was_first
    }

    /// Returns true if the write changed either flag.
    pub fn changed(&self) -> bool {
        self.previous != Some(self.venue.flags())
    }
}

/// Core trait for venue store implementations.
///
/// Reads never block on writers and may observe state that an in-flight
/// write is about to replace. All mutation goes through
/// [`VenueStore::set_sold_out`], which locks the venue row for the whole
/// read-compute-write so concurrent writes to the same name serialize.
#[async_trait]
pub trait VenueStore: Send + Sync {
    /// Finds a live (not soft-deleted) venue by its exact name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Venue>>;

    /// Lists all live venues, ordered by name.
    async fn list(&self) -> Result<Vec<Venue>>;

    /// Records a sold-out status for the named venue in one transaction.
    ///
    /// Locks the row by name (or creates it for an unseen name), computes
    /// the next flags with [`SoldOutFlags::next`], writes both flags
    /// together and commits. On any failure the transaction is rolled back
    /// and a `WriteConflict` (or `ConstraintViolation`) is returned.
    async fn set_sold_out(&self, name: &str, sold_out: bool) -> Result<SoldOutUpdate>;
}

#[async_trait]
impl<T: VenueStore + ?Sized> VenueStore for Arc<T> {
    async fn find_by_name(&self, name: &str) -> Result<Option<Venue>> {
        (**self).find_by_name(name).await
    }

    async fn list(&self) -> Result<Vec<Venue>> {
        (**self).list().await
    }

    async fn set_sold_out(&self, name: &str, sold_out: bool) -> Result<SoldOutUpdate> {
        (**self).set_sold_out(name, sold_out).await
    }
}
