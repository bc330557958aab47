//! Upstream service traits with HTTP adapters and in-memory implementations.

pub mod http;
pub mod identity;
pub mod profile;
pub mod ticket;

pub use http::build_client;
pub use identity::{HttpTokenValidator, InMemoryTokenValidator, TokenClaims, TokenValidator};
pub use profile::{HttpProfileService, InMemoryProfileService, ProfileService};
pub use ticket::{HttpTicketService, InMemoryTicketService, TicketService};
