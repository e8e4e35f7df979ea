//! HTTP-level integration tests for `/categories` and `/genres`.
//!
//! Database-backed: `#[sqlx::test]` needs a PostgreSQL `DATABASE_URL`.

mod common;

use axum::http::StatusCode;
use common::{delete_auth, expect_json, get, post_json_auth, user_with_role, user_with_token};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_manages_categories(pool: PgPool) {
    let (_admin, token) = user_with_role(&pool, "root", "admin").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "name": "Films", "slug": "films" });
    let created = expect_json(
        post_json_auth(app.clone(), "/api/v1/categories", body, &token).await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(created, serde_json::json!({ "name": "Films", "slug": "films" }));

    let list = expect_json(get(app.clone(), "/api/v1/categories").await, StatusCode::OK).await;
    assert_eq!(list["total_count"], 1);
    assert_eq!(list["data"][0]["slug"], "films");

    let response = delete_auth(app.clone(), "/api/v1/categories/films", &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete_auth(app, "/api/v1/categories/films", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_slug_is_400(pool: PgPool) {
    let (_admin, token) = user_with_role(&pool, "root", "admin").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "name": "Drama", "slug": "drama" });
    let first = post_json_auth(app.clone(), "/api/v1/genres", body.clone(), &token).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = post_json_auth(app, "/api/v1/genres", body, &token).await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn invalid_slug_is_400(pool: PgPool) {
    let (_admin, token) = user_with_role(&pool, "root", "admin").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "name": "Sci-Fi", "slug": "sci fi!" });
    let response = post_json_auth(app, "/api/v1/genres", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn non_admin_cannot_create_genre(pool: PgPool) {
    let (_moderator, token) = user_with_role(&pool, "moddy", "moderator").await;
    let (_user, user_token) = user_with_token(&pool, "plain").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "name": "Horror", "slug": "horror" });
    let response = post_json_auth(app.clone(), "/api/v1/genres", body.clone(), &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(app, "/api/v1/genres", body, &user_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn genre_search_is_case_insensitive_substring(pool: PgPool) {
    let (_admin, token) = user_with_role(&pool, "root", "admin").await;
    let app = common::build_test_app(pool);

    for (name, slug) in [("Comedy", "comedy"), ("Dark Comedy", "dark-comedy"), ("Western", "western")] {
        let body = serde_json::json!({ "name": name, "slug": slug });
        let response = post_json_auth(app.clone(), "/api/v1/genres", body, &token).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let json = expect_json(get(app, "/api/v1/genres?search=comed").await, StatusCode::OK).await;
    assert_eq!(json["total_count"], 2);
    assert_eq!(json["data"][0]["name"], "Comedy");
    assert_eq!(json["data"][1]["name"], "Dark Comedy");
}
