//! Handlers for the `/users` resource.
//!
//! Everything except `/users/me` requires admin rights via [`RequireAdmin`].
//! Users are addressed by username.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use marquee_core::error::CoreError;
use marquee_core::roles::{validate_role, ROLE_USER};
use marquee_core::types::DbId;
use marquee_core::users::{validate_email, validate_person_name, validate_username};
use marquee_db::models::user::{CreateUser, UpdateUser, User, UserResponse};
use marquee_db::repositories::UserRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::SearchParams;
use crate::response::PageResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /users`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub bio: String,
    pub role: Option<String>,
}

// ---------------------------------------------------------------------------
// Admin handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/users
///
/// Paginated user list; `?search=` filters by username substring.
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<SearchParams>,
) -> AppResult<Json<PageResponse<UserResponse>>> {
    let (limit, offset) = params.resolve(state.config.default_page_size);
    let pattern = params.pattern();

    let users = UserRepo::list(&state.pool, pattern.as_deref(), limit, offset).await?;
    let total_count = UserRepo::count(&state.pool, pattern.as_deref()).await?;

    Ok(Json(PageResponse {
        data: users.iter().map(UserResponse::from).collect(),
        total_count,
        limit,
        offset,
    }))
}

/// POST /api/v1/users
pub async fn create_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let username = input.username.trim().to_string();
    let email = input.email.trim().to_string();
    validate_username(&username)?;
    validate_email(&email)?;
    validate_person_name("First name", &input.first_name)?;
    validate_person_name("Last name", &input.last_name)?;
    let role = input.role.unwrap_or_else(|| ROLE_USER.to_string());
    validate_role(&role)?;

    ensure_identity_available(
        &state,
        Some(username.as_str()),
        Some(email.as_str()),
        None,
    )
    .await?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username,
            email,
            first_name: input.first_name,
            last_name: input.last_name,
            bio: input.bio,
            role,
            is_superuser: false,
        },
    )
    .await?;

    tracing::info!(
        user_id = user.id,
        username = %user.username,
        created_by = admin.user_id,
        "User created",
    );

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// GET /api/v1/users/{username}
pub async fn get_user(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    AppPath(username): AppPath<String>,
) -> AppResult<Json<UserResponse>> {
    let user = find_user(&state, &username).await?;
    Ok(Json(UserResponse::from(&user)))
}

/// PATCH /api/v1/users/{username}
///
/// Partial update of any profile field, including `role`.
pub async fn update_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppPath(username): AppPath<String>,
    AppJson(input): AppJson<UpdateUser>,
) -> AppResult<Json<UserResponse>> {
    let user = find_user(&state, &username).await?;
    let updated = apply_update(&state, user.id, input).await?;

    tracing::info!(user_id = updated.id, updated_by = admin.user_id, "User updated");

    Ok(Json(UserResponse::from(&updated)))
}

/// DELETE /api/v1/users/{username}
///
/// Removes the account together with its reviews and comments.
pub async fn delete_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    AppPath(username): AppPath<String>,
) -> AppResult<StatusCode> {
    let deleted = UserRepo::delete_by_username(&state.pool, &username).await?;

    if !deleted {
        return Err(AppError::Core(CoreError::NotFoundByKey {
            entity: "User",
            key: username,
        }));
    }

    tracing::info!(username = %username, deleted_by = admin.user_id, "User deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Self-service
// ---------------------------------------------------------------------------

/// GET /api/v1/users/me
pub async fn get_me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;
    Ok(Json(UserResponse::from(&user)))
}

/// PATCH /api/v1/users/me
///
/// Non-admins cannot change their own role; a submitted `role` is ignored.
pub async fn update_me(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(mut input): AppJson<UpdateUser>,
) -> AppResult<Json<UserResponse>> {
    if !auth.is_admin() {
        input.role = None;
    }

    let updated = apply_update(&state, auth.user_id, input).await?;

    tracing::info!(user_id = updated.id, "Profile updated");

    Ok(Json(UserResponse::from(&updated)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_user(state: &AppState, username: &str) -> AppResult<User> {
    UserRepo::find_by_username(&state.pool, username)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundByKey {
                entity: "User",
                key: username.to_string(),
            })
        })
}

/// Validate a partial update and apply it to the user with `id`.
async fn apply_update(state: &AppState, id: DbId, mut input: UpdateUser) -> AppResult<User> {
    input.username = input.username.map(|u| u.trim().to_string());
    input.email = input.email.map(|e| e.trim().to_string());

    if let Some(username) = &input.username {
        validate_username(username)?;
    }
    if let Some(email) = &input.email {
        validate_email(email)?;
    }
    if let Some(first_name) = &input.first_name {
        validate_person_name("First name", first_name)?;
    }
    if let Some(last_name) = &input.last_name {
        validate_person_name("Last name", last_name)?;
    }
    if let Some(role) = &input.role {
        validate_role(role)?;
    }

    ensure_identity_available(
        state,
        input.username.as_deref(),
        input.email.as_deref(),
        Some(id),
    )
    .await?;

    UserRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))
}

/// Reject a username or email that already belongs to another account.
///
/// `except` is the account being updated, which may keep its own values.
async fn ensure_identity_available(
    state: &AppState,
    username: Option<&str>,
    email: Option<&str>,
    except: Option<DbId>,
) -> AppResult<()> {
    if let Some(username) = username {
        if let Some(other) = UserRepo::find_by_username(&state.pool, username).await? {
            if Some(other.id) != except {
                return Err(AppError::Core(CoreError::Validation(format!(
                    "Username '{username}' is already taken"
                ))));
            }
        }
    }
    if let Some(email) = email {
        if let Some(other) = UserRepo::find_by_email(&state.pool, email).await? {
            if Some(other.id) != except {
                return Err(AppError::Core(CoreError::Validation(format!(
                    "Email '{email}' is already registered"
                ))));
            }
        }
    }
    Ok(())
}
