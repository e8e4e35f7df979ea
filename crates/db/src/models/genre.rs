//! Genre entity model and DTOs.

use marquee_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `genres` table. Serializes as `{name, slug}`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Genre {
    #[serde(skip_serializing)]
    pub id: DbId,
    pub name: String,
    pub slug: String,
}

/// A genre joined with the title it is attached to.
///
/// Used to fetch genres for a whole page of titles in one query.
#[derive(Debug, Clone, FromRow)]
pub struct TitleGenre {
    pub title_id: DbId,
    pub id: DbId,
    pub name: String,
    pub slug: String,
}

impl From<TitleGenre> for Genre {
    fn from(row: TitleGenre) -> Self {
        Self {
            id: row.id,
            name: row.name,
            slug: row.slug,
        }
    }
}

/// DTO for creating a genre.
#[derive(Debug, Deserialize)]
pub struct CreateGenre {
    pub name: String,
    pub slug: String,
}
