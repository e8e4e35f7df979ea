//! Request extractors that identify the caller.
//!
//! [`auth::AuthUser`] needs a valid bearer token; [`rbac::RequireAdmin`]
//! additionally needs admin rights.

pub mod auth;
pub mod rbac;
