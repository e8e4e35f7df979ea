//! Title entity model, read projection and DTOs.

use marquee_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::category::Category;
use super::genre::Genre;

/// A title joined with its category and the average of its review scores.
///
/// `rating` is `None` when the title has no reviews.
#[derive(Debug, Clone, FromRow)]
pub struct TitleRow {
    pub id: DbId,
    pub name: String,
    pub year: i32,
    pub description: String,
    pub category_id: Option<DbId>,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    pub rating: Option<f64>,
}

/// Read representation of a title with nested genres and category.
#[derive(Debug, Clone, Serialize)]
pub struct TitleResponse {
    pub id: DbId,
    pub name: String,
    pub year: i32,
    pub rating: Option<f64>,
    pub description: String,
    pub genre: Vec<Genre>,
    pub category: Option<Category>,
}

impl TitleResponse {
    /// Assemble the response from a joined row and its genres.
    pub fn from_row(row: TitleRow, genres: Vec<Genre>) -> Self {
        let category = match (row.category_id, row.category_name, row.category_slug) {
            (Some(id), Some(name), Some(slug)) => Some(Category { id, name, slug }),
            _ => None,
        };
        Self {
            id: row.id,
            name: row.name,
            year: row.year,
            rating: row.rating,
            description: row.description,
            genre: genres,
            category,
        }
    }
}

/// DTO for creating a title. Slugs are resolved to ids by the caller.
#[derive(Debug)]
pub struct CreateTitle {
    pub name: String,
    pub year: i32,
    pub description: String,
    pub category_id: DbId,
    pub genre_ids: Vec<DbId>,
}

/// DTO for updating a title. `genre_ids`, when present, replaces the whole set.
#[derive(Debug, Default)]
pub struct UpdateTitle {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    pub genre_ids: Option<Vec<DbId>>,
}

/// Query parameters for `GET /titles`.
#[derive(Debug, Default, Deserialize)]
pub struct TitleFilter {
    /// Category slug.
    pub category: Option<String>,
    /// Genre slug.
    pub genre: Option<String>,
    /// Case-insensitive substring of the title name.
    pub name: Option<String>,
    pub year: Option<i32>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
