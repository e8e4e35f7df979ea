//! Domain rules for the Marquee review service.
//!
//! This crate has no IO: it holds the error type, id/timestamp aliases,
//! role predicates, input validators, pagination clamps and confirmation
//! code generation. Both `marquee-db` and `marquee-api` depend on it.

pub mod catalog;
pub mod confirmation;
pub mod error;
pub mod pagination;
pub mod reviews;
pub mod roles;
pub mod types;
pub mod users;
