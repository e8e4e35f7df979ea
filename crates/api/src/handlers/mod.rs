//! Request handlers, one submodule per resource.
//!
//! Handlers validate input with `marquee_core`, delegate persistence to the
//! repositories in `marquee_db` and map errors via [`crate::error::AppError`].

pub mod auth;
pub mod categories;
pub mod comments;
pub mod genres;
pub mod reviews;
pub mod titles;
pub mod users;
