use axum::routing::post;
use axum::Router;

use crate::handlers::auth::{signup, token};
use crate::state::AppState;

/// Public endpoints under `/auth`: `POST /signup` emails a code,
/// `POST /token` trades it for a JWT.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/token", post(token))
}
