//! Review entity model and DTOs.

use marquee_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A review joined with its author's username.
///
/// Serializes as `{id, text, author, score, pub_date}`; the foreign keys are
/// kept for permission checks only.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Review {
    pub id: DbId,
    #[serde(skip_serializing)]
    pub title_id: DbId,
    #[serde(skip_serializing)]
    pub author_id: DbId,
    pub text: String,
    /// Author username.
    pub author: String,
    pub score: i16,
    pub pub_date: Timestamp,
}

/// DTO for creating a review.
#[derive(Debug)]
pub struct CreateReview {
    pub title_id: DbId,
    pub author_id: DbId,
    pub text: String,
    pub score: i16,
}

/// DTO for updating a review. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateReview {
    pub text: Option<String>,
    pub score: Option<i16>,
}
