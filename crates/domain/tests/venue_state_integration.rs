//! Integration tests for the venue sell-out state machine.

use std::time::Duration;

use domain::{TicketSoldOut, UpdateVenueStatus, VenueStateManager};
use futures_util::future::join_all;
use venue_store::{InMemoryVenueStore, VenueStore};

fn manager() -> VenueStateManager<InMemoryVenueStore> {
    VenueStateManager::new(InMemoryVenueStore::new())
}

#[tokio::test]
async fn test_sold_out_twice_is_idempotent() {
    let manager = manager();
    manager.set_sold_out("Jakarta", false).await.unwrap();

    let first = manager.set_sold_out("Jakarta", true).await.unwrap();
    assert!(first.venue.is_sold_out);
    assert!(first.venue.is_first_sold_out);
    assert!(first.first_sold_out_triggered());

    let second = manager.set_sold_out("Jakarta", true).await.unwrap();
    assert!(second.venue.is_sold_out);
    assert!(second.venue.is_first_sold_out);
    assert!(!second.first_sold_out_triggered());
    assert!(!second.changed());
}

#[tokio::test]
async fn test_first_sold_out_never_toggles_back() {
    let manager = manager();

    manager.set_sold_out("Jakarta", true).await.unwrap();
    let reopened = manager.set_sold_out("Jakarta", false).await.unwrap();
    let resold = manager.set_sold_out("Jakarta", true).await.unwrap();

    assert!(reopened.venue.is_first_sold_out);
    assert!(resold.venue.is_first_sold_out);
    assert!(!reopened.first_sold_out_triggered());
    assert!(!resold.first_sold_out_triggered());
}

#[tokio::test]
async fn test_many_status_flips_keep_first_flag() {
    let manager = manager();
    manager.set_sold_out("Bali", true).await.unwrap();

    let mut triggers = 0;
    for i in 0..20 {
        let update = manager.set_sold_out("Bali", i % 2 == 0).await.unwrap();
        assert!(update.venue.is_first_sold_out);
        if update.first_sold_out_triggered() {
            triggers += 1;
        }
    }
    assert_eq!(triggers, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writes_serialize() {
    let store = InMemoryVenueStore::new().with_write_delay(Duration::from_millis(2));
    let manager = VenueStateManager::new(store.clone());
    manager.set_sold_out("Jakarta", false).await.unwrap();

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let manager = manager.clone();
            tokio::spawn(async move { manager.set_sold_out("Jakarta", true).await })
        })
        .collect();

    let updates: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    let transitions = updates
        .iter()
        .filter(|u| u.previous.is_some_and(|p| !p.is_sold_out) && u.venue.is_sold_out)
        .count();
    let triggers = updates
        .iter()
        .filter(|u| u.first_sold_out_triggered())
        .count();

    assert_eq!(transitions, 1);
    assert_eq!(triggers, 1);
    // 1 seed write + 16 concurrent writes, none lost
    assert_eq!(store.write_count(), 17);

    let venue = store.find_by_name("Jakarta").await.unwrap().unwrap();
    assert!(venue.is_sold_out);
    assert!(venue.is_first_sold_out);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creation_of_unseen_venue() {
    let store = InMemoryVenueStore::new().with_write_delay(Duration::from_millis(2));
    let manager = VenueStateManager::new(store.clone());

    let updates = join_all((0..8).map(|_| manager.set_sold_out("Medan", true))).await;
    let updates: Vec<_> = updates.into_iter().map(|r| r.unwrap()).collect();

    assert_eq!(updates.iter().filter(|u| u.created()).count(), 1);
    assert_eq!(
        updates
            .iter()
            .filter(|u| u.first_sold_out_triggered())
            .count(),
        1
    );
    assert_eq!(store.venue_count().await, 1);
}

#[tokio::test]
async fn test_writes_to_different_venues_are_independent() {
    let manager = manager();

    manager
        .update_ticket_sold_out(TicketSoldOut::new("Jakarta", true))
        .await
        .unwrap();
    manager
        .update_venue_status(UpdateVenueStatus::new("Bandung", false))
        .await
        .unwrap();

    let venues = manager.list_venues().await.unwrap();
    assert_eq!(venues.len(), 2);
    assert_eq!(venues[0].name, "Bandung");
    assert!(!venues[0].is_first_sold_out);
    assert_eq!(venues[1].name, "Jakarta");
    assert!(venues[1].is_first_sold_out);
}
