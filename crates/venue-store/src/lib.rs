pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;
pub mod venue;

pub use common::VenueId;
pub use error::{Result, VenueStoreError};
pub use memory::InMemoryVenueStore;
pub use postgres::PostgresVenueStore;
pub use store::{SoldOutUpdate, VenueStore};
pub use venue::{SoldOutFlags, Venue};
