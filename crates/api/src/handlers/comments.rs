//! Handlers for comments nested under
//! `/titles/{title_id}/reviews/{review_id}/comments`.
//!
//! The review must belong to the title in the path. Permissions match
//! reviews: authors, moderators and admins may edit or delete.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use marquee_core::error::CoreError;
use marquee_core::reviews::validate_text;
use marquee_core::types::DbId;
use marquee_db::models::comment::{Comment, CreateComment, UpdateComment};
use marquee_db::repositories::CommentRepo;
use serde::Deserialize;

use super::reviews::{ensure_can_modify, find_review};
use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::PageResponse;
use crate::state::AppState;

/// Request body for `POST .../comments`.
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub text: String,
}

/// GET /api/v1/titles/{title_id}/reviews/{review_id}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    AppPath((title_id, review_id)): AppPath<(DbId, DbId)>,
    AppQuery(params): AppQuery<PaginationParams>,
) -> AppResult<Json<PageResponse<Comment>>> {
    let review = find_review(&state, title_id, review_id).await?;
    let (limit, offset) = params.resolve(state.config.default_page_size);

    let data = CommentRepo::list_for_review(&state.pool, review.id, limit, offset).await?;
    let total_count = CommentRepo::count_for_review(&state.pool, review.id).await?;

    Ok(Json(PageResponse {
        data,
        total_count,
        limit,
        offset,
    }))
}

/// POST /api/v1/titles/{title_id}/reviews/{review_id}/comments
pub async fn create_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath((title_id, review_id)): AppPath<(DbId, DbId)>,
    AppJson(input): AppJson<CreateCommentRequest>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    validate_text("Comment", &input.text)?;
    let review = find_review(&state, title_id, review_id).await?;

    let comment = CommentRepo::create(
        &state.pool,
        &CreateComment {
            review_id: review.id,
            author_id: auth.user_id,
            text: input.text,
        },
    )
    .await?;

    tracing::info!(
        comment_id = comment.id,
        review_id,
        user_id = auth.user_id,
        "Comment created",
    );

    Ok((StatusCode::CREATED, Json(comment)))
}

/// GET /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}
pub async fn get_comment(
    State(state): State<AppState>,
    AppPath((title_id, review_id, comment_id)): AppPath<(DbId, DbId, DbId)>,
) -> AppResult<Json<Comment>> {
    Ok(Json(
        find_comment(&state, title_id, review_id, comment_id).await?,
    ))
}

/// PATCH /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}
pub async fn update_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath((title_id, review_id, comment_id)): AppPath<(DbId, DbId, DbId)>,
    AppJson(input): AppJson<UpdateComment>,
) -> AppResult<Json<Comment>> {
    let comment = find_comment(&state, title_id, review_id, comment_id).await?;
    ensure_can_modify(&auth, comment.author_id)?;

    if let Some(text) = &input.text {
        validate_text("Comment", text)?;
    }

    let updated = CommentRepo::update(&state.pool, comment.id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Comment",
            id: comment_id,
        }))?;

    tracing::info!(comment_id, review_id, user_id = auth.user_id, "Comment updated");

    Ok(Json(updated))
}

/// DELETE /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}
pub async fn delete_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    AppPath((title_id, review_id, comment_id)): AppPath<(DbId, DbId, DbId)>,
) -> AppResult<StatusCode> {
    let comment = find_comment(&state, title_id, review_id, comment_id).await?;
    ensure_can_modify(&auth, comment.author_id)?;

    CommentRepo::delete(&state.pool, comment.id).await?;

    tracing::info!(comment_id, review_id, user_id = auth.user_id, "Comment deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Load a comment through its review, 404 if either link does not match.
async fn find_comment(
    state: &AppState,
    title_id: DbId,
    review_id: DbId,
    comment_id: DbId,
) -> AppResult<Comment> {
    let review = find_review(state, title_id, review_id).await?;
    CommentRepo::find(&state.pool, review.id, comment_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Comment",
            id: comment_id,
        }))
}
