//! HTTP route handlers.

pub mod recommendations;
pub mod system;
pub mod tickets;
pub mod venues;
