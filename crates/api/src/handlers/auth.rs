//! Handlers for the `/auth` resource (signup, token).
//!
//! Signup issues a one-time confirmation code by email; `token` exchanges
//! that code for a JWT access token. There are no passwords.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use marquee_core::confirmation::{confirmation_code_matches, generate_confirmation_code};
use marquee_core::error::CoreError;
use marquee_core::roles::ROLE_USER;
use marquee_core::users::{validate_email, validate_username};
use marquee_db::models::user::{CreateUser, User};
use marquee_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::notifications::email::confirmation_email;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/signup`. Also the response body.
#[derive(Debug, Deserialize, Serialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
}

/// Request body for `POST /auth/token`.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub confirmation_code: String,
}

/// Response body for `POST /auth/token`.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/signup
///
/// Register a `user`-role account, or re-issue a code for an existing
/// account when both username and email match it. The plaintext code is
/// emailed; only its hash is stored.
pub async fn signup(
    State(state): State<AppState>,
    AppJson(input): AppJson<SignupRequest>,
) -> AppResult<Json<SignupRequest>> {
    let username = input.username.trim();
    let email = input.email.trim();
    validate_username(username)?;
    validate_email(email)?;

    let user = find_or_register(&state, username, email).await?;

    let code = generate_confirmation_code();
    UserRepo::set_confirmation_code(&state.pool, user.id, &code.hash).await?;

    state
        .mailer
        .send(&confirmation_email(&user.username, &user.email, &code.plaintext))
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to send confirmation email: {e}")))?;

    tracing::info!(user_id = user.id, username = %user.username, "Confirmation code issued");

    Ok(Json(SignupRequest {
        username: user.username,
        email: user.email,
    }))
}

/// POST /api/v1/auth/token
///
/// Exchange a confirmation code for an access token. The code is cleared on
/// success, so each code works once.
pub async fn token(
    State(state): State<AppState>,
    AppJson(input): AppJson<TokenRequest>,
) -> AppResult<(StatusCode, Json<TokenResponse>)> {
    let username = input.username.trim();
    if username.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Username must not be empty".into(),
        )));
    }

    let user = UserRepo::find_by_username(&state.pool, username)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundByKey {
                entity: "User",
                key: username.to_string(),
            })
        })?;

    let stored_hash = user.confirmation_code_hash.as_deref();
    if !confirmation_code_matches(&input.confirmation_code, stored_hash) {
        tracing::warn!(user_id = user.id, "Invalid confirmation code");
        return Err(invalid_code());
    }

    // The conditional clear loses if another request consumed the code first.
    let consumed = match stored_hash {
        Some(hash) => UserRepo::consume_confirmation_code(&state.pool, user.id, hash).await?,
        None => false,
    };
    if !consumed {
        return Err(invalid_code());
    }

    let token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    tracing::info!(user_id = user.id, "Access token issued");

    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn invalid_code() -> AppError {
    AppError::Core(CoreError::Validation("Invalid confirmation code".into()))
}

/// Resolve the signup target: the matching account, or a new one.
///
/// A username or email already used by a *different* account is rejected.
async fn find_or_register(state: &AppState, username: &str, email: &str) -> AppResult<User> {
    if let Some(existing) = UserRepo::find_by_username(&state.pool, username).await? {
        if existing.email == email {
            return Ok(existing);
        }
        return Err(AppError::Core(CoreError::Validation(format!(
            "Username '{username}' is already taken"
        ))));
    }

    if UserRepo::find_by_email(&state.pool, email).await?.is_some() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Email '{email}' is already registered"
        ))));
    }

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: username.to_string(),
            email: email.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            bio: String::new(),
            role: ROLE_USER.to_string(),
            is_superuser: false,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User signed up");
    Ok(user)
}
