//! Repository for the `titles` and `title_genres` tables.
//!
//! Reads go through a single joined projection ([`TitleRow`]) that carries the
//! category and the average review score, so a page of titles costs one query
//! plus one batch genre lookup.

use marquee_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::title::{CreateTitle, TitleRow, UpdateTitle};

/// Joined projection shared by `find_by_id` and `list`.
const SELECT_TITLE_ROW: &str = "\
    SELECT t.id, t.name, t.year, t.description, t.category_id, \
           c.name AS category_name, c.slug AS category_slug, \
           AVG(r.score)::float8 AS rating \
    FROM titles t \
    LEFT JOIN categories c ON c.id = t.category_id \
    LEFT JOIN reviews r ON r.title_id = t.id";

/// Filter shared by `list` and `count`. Placeholders: category slug, genre
/// slug, name `ILIKE` pattern, year.
const FILTER_CLAUSE: &str = "\
    WHERE ($1::text IS NULL OR EXISTS ( \
              SELECT 1 FROM categories fc WHERE fc.id = t.category_id AND fc.slug = $1)) \
      AND ($2::text IS NULL OR EXISTS ( \
              SELECT 1 FROM title_genres ftg JOIN genres fg ON fg.id = ftg.genre_id \
              WHERE ftg.title_id = t.id AND fg.slug = $2)) \
      AND ($3::text IS NULL OR t.name ILIKE $3) \
      AND ($4::int IS NULL OR t.year = $4)";

/// Resolved filter values for title listing.
#[derive(Debug, Default)]
pub struct TitleQuery<'a> {
    pub category_slug: Option<&'a str>,
    pub genre_slug: Option<&'a str>,
    pub name_pattern: Option<&'a str>,
    pub year: Option<i32>,
}

/// Provides CRUD operations for titles.
pub struct TitleRepo;

impl TitleRepo {
    /// Insert a title and its genre links in one transaction. Returns the new id.
    pub async fn create(pool: &PgPool, input: &CreateTitle) -> Result<DbId, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO titles (name, year, description, category_id)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(&input.name)
        .bind(input.year)
        .bind(&input.description)
        .bind(input.category_id)
        .fetch_one(&mut *tx)
        .await?;

        link_genres(&mut tx, id, &input.genre_ids).await?;
        tx.commit().await?;

        tracing::debug!(title_id = id, genres = input.genre_ids.len(), "Title inserted");
        Ok(id)
    }

    /// Find a title by ID with its category and rating.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TitleRow>, sqlx::Error> {
        let query = format!("{SELECT_TITLE_ROW} WHERE t.id = $1 GROUP BY t.id, c.id");
        sqlx::query_as::<_, TitleRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Check whether a title exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM titles WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// List titles newest first, then by name.
    pub async fn list(
        pool: &PgPool,
        filter: &TitleQuery<'_>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TitleRow>, sqlx::Error> {
        let query = format!(
            "{SELECT_TITLE_ROW} {FILTER_CLAUSE} \
             GROUP BY t.id, c.id \
             ORDER BY t.year DESC, t.name, t.id \
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, TitleRow>(&query)
            .bind(filter.category_slug)
            .bind(filter.genre_slug)
            .bind(filter.name_pattern)
            .bind(filter.year)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count titles matching the same filter as [`TitleRepo::list`].
    pub async fn count(pool: &PgPool, filter: &TitleQuery<'_>) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM titles t {FILTER_CLAUSE}");
        sqlx::query_scalar(&query)
            .bind(filter.category_slug)
            .bind(filter.genre_slug)
            .bind(filter.name_pattern)
            .bind(filter.year)
            .fetch_one(pool)
            .await
    }

    /// Update a title. Only non-`None` fields are applied; a present
    /// `genre_ids` replaces the whole genre set.
    ///
    /// Returns `false` if no row with the given `id` exists.
    pub async fn update(pool: &PgPool, id: DbId, input: &UpdateTitle) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            "UPDATE titles SET
                name = COALESCE($2, name),
                year = COALESCE($3, year),
                description = COALESCE($4, description),
                category_id = COALESCE($5, category_id)
             WHERE id = $1",
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.year)
        .bind(&input.description)
        .bind(input.category_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        if let Some(genre_ids) = &input.genre_ids {
            sqlx::query("DELETE FROM title_genres WHERE title_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            link_genres(&mut tx, id, genre_ids).await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    /// Delete a title. Reviews and their comments cascade.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM titles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Insert `title_genres` rows for every genre id.
async fn link_genres(
    tx: &mut Transaction<'_, Postgres>,
    title_id: DbId,
    genre_ids: &[DbId],
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO title_genres (title_id, genre_id)
         SELECT $1, UNNEST($2::bigint[])
         ON CONFLICT (title_id, genre_id) DO NOTHING",
    )
    .bind(title_id)
    .bind(genre_ids)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
