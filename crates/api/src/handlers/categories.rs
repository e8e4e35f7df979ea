//! Handlers for the `/categories` resource.
//!
//! Reads are public; creation and deletion require admin rights.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use marquee_core::catalog::{validate_name, validate_slug};
use marquee_core::error::CoreError;
use marquee_db::models::category::{Category, CreateCategory};
use marquee_db::repositories::CategoryRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::rbac::RequireAdmin;
use crate::query::SearchParams;
use crate::response::PageResponse;
use crate::state::AppState;

/// GET /api/v1/categories
///
/// Paginated list ordered by name; `?search=` filters by name substring.
pub async fn list_categories(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<SearchParams>,
) -> AppResult<Json<PageResponse<Category>>> {
    let (limit, offset) = params.resolve(state.config.default_page_size);
    let pattern = params.pattern();

    let data = CategoryRepo::list(&state.pool, pattern.as_deref(), limit, offset).await?;
    let total_count = CategoryRepo::count(&state.pool, pattern.as_deref()).await?;

    Ok(Json(PageResponse {
        data,
        total_count,
        limit,
        offset,
    }))
}

/// POST /api/v1/categories
pub async fn create_category(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppJson(mut input): AppJson<CreateCategory>,
) -> AppResult<(StatusCode, Json<Category>)> {
    input.name = input.name.trim().to_string();
    validate_name("Category", &input.name)?;
    validate_slug(&input.slug)?;

    if CategoryRepo::find_by_slug(&state.pool, &input.slug)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Category with slug '{}' already exists",
            input.slug
        ))));
    }

    let category = CategoryRepo::create(&state.pool, &input).await?;

    tracing::info!(
        category_id = category.id,
        slug = %category.slug,
        user_id = admin.user_id,
        "Category created",
    );

    Ok((StatusCode::CREATED, Json(category)))
}

/// DELETE /api/v1/categories/{slug}
///
/// Titles in the category keep existing with no category.
pub async fn delete_category(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppPath(slug): AppPath<String>,
) -> AppResult<StatusCode> {
    let deleted = CategoryRepo::delete_by_slug(&state.pool, &slug).await?;

    if !deleted {
        return Err(AppError::Core(CoreError::NotFoundByKey {
            entity: "Category",
            key: slug,
        }));
    }

    tracing::info!(slug = %slug, user_id = admin.user_id, "Category deleted");

    Ok(StatusCode::NO_CONTENT)
}
