//! HTTP layer of the Marquee review service.
//!
//! Built as a library so `tests/` can assemble the same router the binary
//! serves.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod notifications;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
