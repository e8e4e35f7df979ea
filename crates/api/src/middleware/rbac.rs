//! Role gates layered on top of [`AuthUser`].
//!
//! Only the admin gate is route-wide. Moderator rights apply to individual
//! reviews and comments and are checked in those handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use marquee_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Caller with the `admin` role or the superuser flag; anyone else gets 403.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.is_admin() {
            Ok(Self(user))
        } else {
            tracing::debug!(user_id = user.user_id, role = %user.role, "Admin gate refused");
            Err(CoreError::Forbidden("Administrator rights required".into()).into())
        }
    }
}
