//! Repository for the `reviews` table.

use marquee_core::types::DbId;
use sqlx::PgPool;

use crate::models::review::{CreateReview, Review, UpdateReview};

/// Projection joining the author's username; expects the review row aliased as `r`.
const SELECT_REVIEW: &str = "\
    SELECT r.id, r.title_id, r.author_id, r.text, u.username AS author, r.score, r.pub_date \
    FROM reviews r \
    JOIN users u ON u.id = r.author_id";

/// Provides CRUD operations for reviews.
pub struct ReviewRepo;

impl ReviewRepo {
    /// Insert a new review, returning it with the author's username.
    ///
    /// A second review by the same author on the same title violates
    /// `uq_reviews_title_author`.
    pub async fn create(pool: &PgPool, input: &CreateReview) -> Result<Review, sqlx::Error> {
        sqlx::query_as::<_, Review>(
            "WITH r AS (
                INSERT INTO reviews (title_id, author_id, text, score)
                VALUES ($1, $2, $3, $4)
                RETURNING id, title_id, author_id, text, score, pub_date
             )
             SELECT r.id, r.title_id, r.author_id, r.text, u.username AS author, r.score, r.pub_date
             FROM r JOIN users u ON u.id = r.author_id",
        )
        .bind(input.title_id)
        .bind(input.author_id)
        .bind(&input.text)
        .bind(input.score)
        .fetch_one(pool)
        .await
    }

    /// Find a review by ID, scoped to its title.
    pub async fn find(
        pool: &PgPool,
        title_id: DbId,
        review_id: DbId,
    ) -> Result<Option<Review>, sqlx::Error> {
        let query = format!("{SELECT_REVIEW} WHERE r.id = $1 AND r.title_id = $2");
        sqlx::query_as::<_, Review>(&query)
            .bind(review_id)
            .bind(title_id)
            .fetch_optional(pool)
            .await
    }

    /// Whether the author already reviewed the title.
    pub async fn exists_for_author(
        pool: &PgPool,
        title_id: DbId,
        author_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM reviews WHERE title_id = $1 AND author_id = $2)",
        )
        .bind(title_id)
        .bind(author_id)
        .fetch_one(pool)
        .await
    }

    /// List a title's reviews, newest first.
    pub async fn list_for_title(
        pool: &PgPool,
        title_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Review>, sqlx::Error> {
        let query = format!(
            "{SELECT_REVIEW} WHERE r.title_id = $1
             ORDER BY r.pub_date DESC, r.id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(title_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count a title's reviews.
    pub async fn count_for_title(pool: &PgPool, title_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE title_id = $1")
            .bind(title_id)
            .fetch_one(pool)
            .await
    }

    /// Update a review. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateReview,
    ) -> Result<Option<Review>, sqlx::Error> {
        sqlx::query_as::<_, Review>(
            "WITH r AS (
                UPDATE reviews SET
                    text = COALESCE($2, text),
                    score = COALESCE($3, score)
                WHERE id = $1
                RETURNING id, title_id, author_id, text, score, pub_date
             )
             SELECT r.id, r.title_id, r.author_id, r.text, u.username AS author, r.score, r.pub_date
             FROM r JOIN users u ON u.id = r.author_id",
        )
        .bind(id)
        .bind(&input.text)
        .bind(input.score)
        .fetch_optional(pool)
        .await
    }

    /// Delete a review. Its comments cascade.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
