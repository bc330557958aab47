use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, RwLock};

use crate::{
    Result, SoldOutFlags, Venue, VenueId, VenueStoreError,
    store::{SoldOutUpdate, VenueStore},
};

/// In-memory venue store for tests and local runs.
///
/// Mirrors the PostgreSQL store's locking: each venue name has its own
/// async mutex standing in for the row lock, held across the read, the
/// flag computation and the write.
#[derive(Clone, Default)]
pub struct InMemoryVenueStore {
    venues: Arc<RwLock<HashMap<String, Venue>>>,
    row_locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
    write_delay: Option<Duration>,
    fail_writes: Arc<AtomicBool>,
    unavailable: Arc<AtomicBool>,
    writes: Arc<AtomicUsize>,
    reads: Arc<AtomicUsize>,
}

impl InMemoryVenueStore {
    /// Creates a new empty in-memory venue store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleeps between the locked read and the write, widening the window
    /// in which a missing row lock would let writes interleave.
    pub fn with_write_delay(mut self, delay: Duration) -> Self {
        self.write_delay = Some(delay);
        self
    }

    /// Inserts a venue with the given flags, bypassing the state machine.
    pub async fn seed(&self, name: &str, is_sold_out: bool, is_first_sold_out: bool) -> Venue {
        let venue = Venue {
            id: VenueId::new(),
            name: name.to_string(),
            is_sold_out,
            is_first_sold_out,
            created_at: Utc::now(),
            updated_at: None,
            deleted_at: None,
        };
        self.venues
            .write()
            .await
            .insert(name.to_string(), venue.clone());
        venue
    }

    /// Marks a venue as soft-deleted.
    pub async fn soft_delete(&self, name: &str) {
        if let Some(venue) = self.venues.write().await.get_mut(name) {
            venue.deleted_at = Some(Utc::now());
        }
    }

    /// Configures the store to reject writes with a write conflict.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Configures the store to behave as if the database were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Returns the number of committed writes.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Returns the number of reads served.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Returns the number of venues stored, including soft-deleted ones.
    pub async fn venue_count(&self) -> usize {
        self.venues.read().await.len()
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(VenueStoreError::Unavailable(
                "in-memory store switched off".to_string(),
            ));
        }
        Ok(())
    }

    async fn row_lock(&self, name: &str) -> Arc<Mutex<()>> {
        let mut locks = self.row_locks.lock().await;
        locks.entry(name.to_string()).or_default().clone()
    }
}

#[async_trait]
impl VenueStore for InMemoryVenueStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<Venue>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        let venues = self.venues.read().await;
        Ok(venues.get(name).filter(|v| !v.is_deleted()).cloned())
    }

    async fn list(&self) -> Result<Vec<Venue>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        let venues = self.venues.read().await;
        let mut live: Vec<_> = venues
            .values()
            .filter(|v| !v.is_deleted())
            .cloned()
            .collect();
        live.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(live)
    }

    async fn set_sold_out(&self, name: &str, sold_out: bool) -> Result<SoldOutUpdate> {
        self.check_available()?;

        let lock = self.row_lock(name).await;
        let _row = lock.lock().await;

        let existing = self.venues.read().await.get(name).cloned();
        let previous = existing.as_ref().map(Venue::flags);
        let next = SoldOutFlags::next(previous, sold_out);

        if let Some(delay) = self.write_delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(VenueStoreError::WriteConflict {
                venue: name.to_string(),
                reason: "write rejected by test configuration".to_string(),
            });
        }

        let now = Utc::now();
        let venue = match existing {
            Some(mut venue) => {
                venue.is_sold_out = next.is_sold_out;
                venue.is_first_sold_out = next.is_first_sold_out;
                venue.updated_at = Some(now);
                venue
            }
            None => Venue {
                id: VenueId::new(),
                name: name.to_string(),
                is_sold_out: next.is_sold_out,
                is_first_sold_out: next.is_first_sold_out,
                created_at: now,
                updated_at: None,
                deleted_at: None,
            },
        };

        self.venues
            .write()
            .await
            .insert(name.to_string(), venue.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);

        Ok(SoldOutUpdate { venue, previous })
    }
}
