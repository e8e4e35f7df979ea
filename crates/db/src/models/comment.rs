//! Comment entity model and DTOs.

use marquee_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A comment joined with its author's username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    #[serde(skip_serializing)]
    pub review_id: DbId,
    #[serde(skip_serializing)]
    pub author_id: DbId,
    pub text: String,
    /// Author username.
    pub author: String,
    pub pub_date: Timestamp,
}

/// DTO for creating a comment.
#[derive(Debug)]
pub struct CreateComment {
    pub review_id: DbId,
    pub author_id: DbId,
    pub text: String,
}

/// DTO for updating a comment.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateComment {
    pub text: Option<String>,
}
