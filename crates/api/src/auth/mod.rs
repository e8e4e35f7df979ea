//! Token issuance for authenticated sessions.
//!
//! - [`jwt`] -- JWT access-token generation and validation.

pub mod jwt;
