//! Handlers for the `/titles` resource.
//!
//! Reads are public and return the full read projection (nested genres and
//! category, average rating). Writes take genre and category slugs and
//! require admin rights.

use std::collections::HashMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use marquee_core::catalog::{normalize_genre_slugs, validate_name, validate_slug, validate_year};
use marquee_core::error::CoreError;
use marquee_core::types::DbId;
use marquee_db::models::genre::Genre;
use marquee_db::models::title::{CreateTitle, TitleFilter, TitleResponse, TitleRow, UpdateTitle};
use marquee_db::repositories::title_repo::TitleQuery;
use marquee_db::repositories::{CategoryRepo, GenreRepo, TitleRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::rbac::RequireAdmin;
use crate::query::{resolve_page, search_pattern};
use crate::response::PageResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /titles`.
#[derive(Debug, Deserialize)]
pub struct CreateTitleRequest {
    pub name: String,
    pub year: i32,
    #[serde(default)]
    pub description: String,
    /// Genre slugs; at least one.
    pub genre: Vec<String>,
    /// Category slug.
    pub category: String,
}

/// Request body for `PATCH /titles/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateTitleRequest {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    /// Replaces the whole genre set when present.
    pub genre: Option<Vec<String>>,
    pub category: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/titles
///
/// Filters: `?category=<slug>&genre=<slug>&name=<substring>&year=<int>`.
pub async fn list_titles(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<TitleFilter>,
) -> AppResult<Json<PageResponse<TitleResponse>>> {
    let (limit, offset) = resolve_page(filter.limit, filter.offset, state.config.default_page_size);
    let name_pattern = search_pattern(filter.name.as_deref());
    let query = TitleQuery {
        category_slug: non_blank(filter.category.as_deref()),
        genre_slug: non_blank(filter.genre.as_deref()),
        name_pattern: name_pattern.as_deref(),
        year: filter.year,
    };

    let rows = TitleRepo::list(&state.pool, &query, limit, offset).await?;
    let total_count = TitleRepo::count(&state.pool, &query).await?;
    let data = attach_genres(&state, rows).await?;

    Ok(Json(PageResponse {
        data,
        total_count,
        limit,
        offset,
    }))
}

/// GET /api/v1/titles/{id}
pub async fn get_title(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<TitleResponse>> {
    Ok(Json(load_title(&state, id).await?))
}

/// POST /api/v1/titles
pub async fn create_title(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateTitleRequest>,
) -> AppResult<(StatusCode, Json<TitleResponse>)> {
    let name = input.name.trim().to_string();
    validate_name("Title", &name)?;
    validate_year(input.year)?;

    let category_id = resolve_category(&state, &input.category).await?;
    let genre_ids = resolve_genres(&state, &input.genre).await?;

    let id = TitleRepo::create(
        &state.pool,
        &CreateTitle {
            name,
            year: input.year,
            description: input.description,
            category_id,
            genre_ids,
        },
    )
    .await?;

    tracing::info!(title_id = id, user_id = admin.user_id, "Title created");

    Ok((StatusCode::CREATED, Json(load_title(&state, id).await?)))
}

/// PATCH /api/v1/titles/{id}
pub async fn update_title(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateTitleRequest>,
) -> AppResult<Json<TitleResponse>> {
    if !TitleRepo::exists(&state.pool, id).await? {
        return Err(title_not_found(id));
    }

    let name = input.name.map(|n| n.trim().to_string());
    if let Some(name) = &name {
        validate_name("Title", name)?;
    }
    if let Some(year) = input.year {
        validate_year(year)?;
    }
    let category_id = match &input.category {
        Some(slug) => Some(resolve_category(&state, slug).await?),
        None => None,
    };
    let genre_ids = match &input.genre {
        Some(slugs) => Some(resolve_genres(&state, slugs).await?),
        None => None,
    };

    let updated = TitleRepo::update(
        &state.pool,
        id,
        &UpdateTitle {
            name,
            year: input.year,
            description: input.description,
            category_id,
            genre_ids,
        },
    )
    .await?;
    if !updated {
        return Err(title_not_found(id));
    }

    tracing::info!(title_id = id, user_id = admin.user_id, "Title updated");

    Ok(Json(load_title(&state, id).await?))
}

/// DELETE /api/v1/titles/{id}
///
/// Reviews and their comments are removed with the title.
pub async fn delete_title(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    if !TitleRepo::delete(&state.pool, id).await? {
        return Err(title_not_found(id));
    }

    tracing::info!(title_id = id, user_id = admin.user_id, "Title deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn title_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Title", id })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Load one title in its read representation.
pub(crate) async fn load_title(state: &AppState, id: DbId) -> AppResult<TitleResponse> {
    let row = TitleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| title_not_found(id))?;
    let mut titles = attach_genres(state, vec![row]).await?;
    titles.pop().ok_or_else(|| title_not_found(id))
}

/// Fetch genres for a page of titles in one query and build the responses.
async fn attach_genres(state: &AppState, rows: Vec<TitleRow>) -> AppResult<Vec<TitleResponse>> {
    let ids: Vec<DbId> = rows.iter().map(|r| r.id).collect();
    let mut by_title: HashMap<DbId, Vec<Genre>> = HashMap::new();
    for link in GenreRepo::list_for_titles(&state.pool, &ids).await? {
        by_title.entry(link.title_id).or_default().push(link.into());
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let genres = by_title.remove(&row.id).unwrap_or_default();
            TitleResponse::from_row(row, genres)
        })
        .collect())
}

/// Resolve a category slug, rejecting unknown slugs with 400.
async fn resolve_category(state: &AppState, slug: &str) -> AppResult<DbId> {
    validate_slug(slug)?;
    CategoryRepo::find_by_slug(&state.pool, slug)
        .await?
        .map(|c| c.id)
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!(
                "Category '{slug}' does not exist"
            )))
        })
}

/// Resolve genre slugs, rejecting an empty list or any unknown slug with 400.
async fn resolve_genres(state: &AppState, slugs: &[String]) -> AppResult<Vec<DbId>> {
    let slugs = normalize_genre_slugs(slugs)?;
    let genres = GenreRepo::find_by_slugs(&state.pool, &slugs).await?;

    let missing: Vec<&str> = slugs
        .iter()
        .filter(|s| !genres.iter().any(|g| &g.slug == *s))
        .map(String::as_str)
        .collect();
    if !missing.is_empty() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown genre(s): {}",
            missing.join(", ")
        ))));
    }

    Ok(genres.into_iter().map(|g| g.id).collect())
}
