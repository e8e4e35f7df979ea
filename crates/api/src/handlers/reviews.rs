//! Handlers for reviews nested under `/titles/{title_id}/reviews`.
//!
//! Reads are public. Any authenticated user may review a title once; the
//! author, moderators and admins may edit or delete a review.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use marquee_core::error::CoreError;
use marquee_core::reviews::{validate_score, validate_text};
use marquee_core::types::DbId;
use marquee_db::models::review::{CreateReview, Review, UpdateReview};
use marquee_db::repositories::{ReviewRepo, TitleRepo};
use serde::Deserialize;

use crate::error::{is_unique_violation, AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::PageResponse;
use crate::state::AppState;

const UNIQUE_REVIEW_CONSTRAINT: &str = "uq_reviews_title_author";

fn already_reviewed() -> AppError {
    CoreError::Validation("You have already reviewed this title".into()).into()
}

/// Request body for `POST /titles/{title_id}/reviews`.
#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub text: String,
    pub score: i16,
}

/// GET /api/v1/titles/{title_id}/reviews
pub async fn list_reviews(
    State(state): State<AppState>,
    AppPath(title_id): AppPath<DbId>,
    AppQuery(params): AppQuery<PaginationParams>,
) -> AppResult<Json<PageResponse<Review>>> {
    ensure_title_exists(&state, title_id).await?;
    let (limit, offset) = params.resolve(state.config.default_page_size);

    let data = ReviewRepo::list_for_title(&state.pool, title_id, limit, offset).await?;
    let total_count = ReviewRepo::count_for_title(&state.pool, title_id).await?;

    Ok(Json(PageResponse {
        data,
        total_count,
        limit,
        offset,
    }))
}

/// POST /api/v1/titles/{title_id}/reviews
///
/// One review per author per title; a second attempt is a 400.
pub async fn create_review(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath(title_id): AppPath<DbId>,
    AppJson(input): AppJson<CreateReviewRequest>,
) -> AppResult<(StatusCode, Json<Review>)> {
    validate_text("Review", &input.text)?;
    validate_score(input.score)?;
    ensure_title_exists(&state, title_id).await?;

    if ReviewRepo::exists_for_author(&state.pool, title_id, auth.user_id).await? {
        return Err(already_reviewed());
    }

    let input = CreateReview {
        title_id,
        author_id: auth.user_id,
        text: input.text,
        score: input.score,
    };
    // A concurrent request from the same author can slip past the check above.
    let review = match ReviewRepo::create(&state.pool, &input).await {
        Ok(review) => review,
        Err(e) if is_unique_violation(&e, UNIQUE_REVIEW_CONSTRAINT) => {
            return Err(already_reviewed());
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(
        review_id = review.id,
        title_id,
        user_id = auth.user_id,
        score = review.score,
        "Review created",
    );

    Ok((StatusCode::CREATED, Json(review)))
}

/// GET /api/v1/titles/{title_id}/reviews/{review_id}
pub async fn get_review(
    State(state): State<AppState>,
    AppPath((title_id, review_id)): AppPath<(DbId, DbId)>,
) -> AppResult<Json<Review>> {
    Ok(Json(find_review(&state, title_id, review_id).await?))
}

/// PATCH /api/v1/titles/{title_id}/reviews/{review_id}
pub async fn update_review(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath((title_id, review_id)): AppPath<(DbId, DbId)>,
    AppJson(input): AppJson<UpdateReview>,
) -> AppResult<Json<Review>> {
    let review = find_review(&state, title_id, review_id).await?;
    ensure_can_modify(&auth, review.author_id)?;

    if let Some(text) = &input.text {
        validate_text("Review", text)?;
    }
    if let Some(score) = input.score {
        validate_score(score)?;
    }

    let updated = ReviewRepo::update(&state.pool, review.id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Review",
            id: review_id,
        }))?;

    tracing::info!(review_id, title_id, user_id = auth.user_id, "Review updated");

    Ok(Json(updated))
}

/// DELETE /api/v1/titles/{title_id}/reviews/{review_id}
pub async fn delete_review(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath((title_id, review_id)): AppPath<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let review = find_review(&state, title_id, review_id).await?;
    ensure_can_modify(&auth, review.author_id)?;

    ReviewRepo::delete(&state.pool, review.id).await?;

    tracing::info!(review_id, title_id, user_id = auth.user_id, "Review deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn ensure_title_exists(state: &AppState, title_id: DbId) -> AppResult<()> {
    if TitleRepo::exists(&state.pool, title_id).await? {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Title",
            id: title_id,
        }))
    }
}

/// Load a review, 404 unless it belongs to `title_id`.
pub(crate) async fn find_review(
    state: &AppState,
    title_id: DbId,
    review_id: DbId,
) -> AppResult<Review> {
    ReviewRepo::find(&state.pool, title_id, review_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Review",
            id: review_id,
        }))
}

/// Authors, moderators and admins may change authored content.
pub(crate) fn ensure_can_modify(auth: &AuthUser, author_id: DbId) -> AppResult<()> {
    if auth.can_modify(author_id) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "Only the author, a moderator or an admin may change this".into(),
        )))
    }
}
