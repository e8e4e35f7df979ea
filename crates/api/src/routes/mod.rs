pub mod auth;
pub mod catalog;
pub mod health;
pub mod titles;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup                                          signup (public)
/// /auth/token                                           exchange code for JWT (public)
///
/// /users                                                list, create (admin only)
/// /users/me                                             get, update own profile
/// /users/{username}                                     get, update, delete (admin only)
///
/// /categories                                           list (public), create (admin)
/// /categories/{slug}                                    delete (admin)
/// /genres                                               list (public), create (admin)
/// /genres/{slug}                                        delete (admin)
///
/// /titles                                               list (public), create (admin)
/// /titles/{id}                                          get (public), update, delete (admin)
/// /titles/{title_id}/reviews                            list, create
/// /titles/{title_id}/reviews/{review_id}                get, update, delete
/// /titles/{title_id}/reviews/{review_id}/comments       list, create
/// /titles/{title_id}/reviews/{review_id}/comments/{id}  get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Signup and token exchange.
        .nest("/auth", auth::router())
        // User administration and self-service profile.
        .nest("/users", users::router())
        // Catalog taxonomy.
        .nest("/categories", catalog::categories_router())
        .nest("/genres", catalog::genres_router())
        // Titles with nested reviews and comments.
        .nest("/titles", titles::router())
}
