//! Handlers for the `/genres` resource. Same contract as categories.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use marquee_core::catalog::{validate_name, validate_slug};
use marquee_core::error::CoreError;
use marquee_db::models::genre::{CreateGenre, Genre};
use marquee_db::repositories::GenreRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::rbac::RequireAdmin;
use crate::query::SearchParams;
use crate::response::PageResponse;
use crate::state::AppState;

/// GET /api/v1/genres
pub async fn list_genres(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<SearchParams>,
) -> AppResult<Json<PageResponse<Genre>>> {
    let (limit, offset) = params.resolve(state.config.default_page_size);
    let pattern = params.pattern();

    let data = GenreRepo::list(&state.pool, pattern.as_deref(), limit, offset).await?;
    let total_count = GenreRepo::count(&state.pool, pattern.as_deref()).await?;

    Ok(Json(PageResponse {
        data,
        total_count,
        limit,
        offset,
    }))
}

/// POST /api/v1/genres
pub async fn create_genre(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppJson(mut input): AppJson<CreateGenre>,
) -> AppResult<(StatusCode, Json<Genre>)> {
    input.name = input.name.trim().to_string();
    validate_name("Genre", &input.name)?;
    validate_slug(&input.slug)?;

    if GenreRepo::find_by_slug(&state.pool, &input.slug)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Genre with slug '{}' already exists",
            input.slug
        ))));
    }

    let genre = GenreRepo::create(&state.pool, &input).await?;

    tracing::info!(
        genre_id = genre.id,
        slug = %genre.slug,
        user_id = admin.user_id,
        "Genre created",
    );

    Ok((StatusCode::CREATED, Json(genre)))
}

/// DELETE /api/v1/genres/{slug}
pub async fn delete_genre(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppPath(slug): AppPath<String>,
) -> AppResult<StatusCode> {
    let deleted = GenreRepo::delete_by_slug(&state.pool, &slug).await?;

    if !deleted {
        return Err(AppError::Core(CoreError::NotFoundByKey {
            entity: "Genre",
            key: slug,
        }));
    }

    tracing::info!(slug = %slug, user_id = admin.user_id, "Genre deleted");

    Ok(StatusCode::NO_CONTENT)
}
