//! Outgoing notifications.
//!
//! - [`email`] -- confirmation-code mail over SMTP, or to the log in development.

pub mod email;
