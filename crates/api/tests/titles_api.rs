//! HTTP-level integration tests for `/titles`.
//!
//! Database-backed: `#[sqlx::test]` needs a PostgreSQL `DATABASE_URL`.

mod common;

use axum::http::StatusCode;
use common::{
    delete_auth, expect_json, get, patch_json_auth, post_json_auth, user_with_role,
    user_with_token,
};
use sqlx::PgPool;

/// Create categories `films`, `books` and genres `drama`, `comedy`.
async fn seed_catalog(app: &axum::Router, token: &str) {
    for (name, slug) in [("Films", "films"), ("Books", "books")] {
        let body = serde_json::json!({ "name": name, "slug": slug });
        let response = post_json_auth(app.clone(), "/api/v1/categories", body, token).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }
    for (name, slug) in [("Drama", "drama"), ("Comedy", "comedy")] {
        let body = serde_json::json!({ "name": name, "slug": slug });
        let response = post_json_auth(app.clone(), "/api/v1/genres", body, token).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}

async fn create_title(
    app: &axum::Router,
    token: &str,
    name: &str,
    year: i32,
    category: &str,
    genres: &[&str],
) -> serde_json::Value {
    let body = serde_json::json!({
        "name": name,
        "year": year,
        "category": category,
        "genre": genres,
    });
    expect_json(
        post_json_auth(app.clone(), "/api/v1/titles", body, token).await,
        StatusCode::CREATED,
    )
    .await
}

#[sqlx::test(migrations = "../db/migrations")]
async fn created_title_has_read_representation(pool: PgPool) {
    let (_admin, token) = user_with_role(&pool, "root", "admin").await;
    let app = common::build_test_app(pool);
    seed_catalog(&app, &token).await;

    let json = create_title(&app, &token, "Casablanca", 1942, "films", &["drama", "comedy"]).await;

    assert!(json["id"].is_i64());
    assert_eq!(json["name"], "Casablanca");
    assert_eq!(json["year"], 1942);
    assert_eq!(json["rating"], serde_json::Value::Null);
    assert_eq!(json["description"], "");
    assert_eq!(
        json["category"],
        serde_json::json!({ "name": "Films", "slug": "films" })
    );
    assert_eq!(
        json["genre"],
        serde_json::json!([
            { "name": "Comedy", "slug": "comedy" },
            { "name": "Drama", "slug": "drama" },
        ])
    );

    let id = json["id"].as_i64().unwrap();
    let fetched = expect_json(
        get(app, &format!("/api/v1/titles/{id}")).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(fetched, json);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn title_writes_are_validated(pool: PgPool) {
    let (_admin, token) = user_with_role(&pool, "root", "admin").await;
    let app = common::build_test_app(pool);
    seed_catalog(&app, &token).await;

    let cases = [
        serde_json::json!({ "name": "X", "year": 2000, "category": "films", "genre": [] }),
        serde_json::json!({ "name": "X", "year": 2000, "category": "films", "genre": ["opera"] }),
        serde_json::json!({ "name": "X", "year": 2000, "category": "games", "genre": ["drama"] }),
        serde_json::json!({ "name": "X", "year": 9999, "category": "films", "genre": ["drama"] }),
        serde_json::json!({ "name": "  ", "year": 2000, "category": "films", "genre": ["drama"] }),
    ];
    for body in cases {
        let response = post_json_auth(app.clone(), "/api/v1/titles", body.clone(), &token).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn non_admin_cannot_create_title(pool: PgPool) {
    let (_admin, admin_token) = user_with_role(&pool, "root", "admin").await;
    let (_user, token) = user_with_token(&pool, "plain").await;
    let app = common::build_test_app(pool);
    seed_catalog(&app, &admin_token).await;

    let body = serde_json::json!({ "name": "X", "year": 2000, "category": "films", "genre": ["drama"] });
    let response = post_json_auth(app, "/api/v1/titles", body, &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn titles_filter_and_order(pool: PgPool) {
    let (_admin, token) = user_with_role(&pool, "root", "admin").await;
    let app = common::build_test_app(pool);
    seed_catalog(&app, &token).await;

    create_title(&app, &token, "Old Drama", 1950, "films", &["drama"]).await;
    create_title(&app, &token, "New Comedy", 2010, "films", &["comedy"]).await;
    create_title(&app, &token, "A Book", 2010, "books", &["drama", "comedy"]).await;

    let all = expect_json(get(app.clone(), "/api/v1/titles").await, StatusCode::OK).await;
    let names: Vec<&str> = all["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["A Book", "New Comedy", "Old Drama"]);

    let by_category = expect_json(
        get(app.clone(), "/api/v1/titles?category=films").await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(by_category["total_count"], 2);

    let by_genre = expect_json(
        get(app.clone(), "/api/v1/titles?genre=comedy").await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(by_genre["total_count"], 2);

    let by_name = expect_json(
        get(app.clone(), "/api/v1/titles?name=drama").await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(by_name["total_count"], 1);
    assert_eq!(by_name["data"][0]["name"], "Old Drama");

    let combined = expect_json(
        get(app, "/api/v1/titles?year=2010&genre=drama").await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(combined["total_count"], 1);
    assert_eq!(combined["data"][0]["name"], "A Book");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn patch_replaces_genres_and_keeps_other_fields(pool: PgPool) {
    let (_admin, token) = user_with_role(&pool, "root", "admin").await;
    let app = common::build_test_app(pool);
    seed_catalog(&app, &token).await;

    let title = create_title(&app, &token, "Shifter", 1999, "films", &["drama"]).await;
    let id = title["id"].as_i64().unwrap();

    let body = serde_json::json!({ "genre": ["comedy"], "description": "Now funny" });
    let json = expect_json(
        patch_json_auth(app, &format!("/api/v1/titles/{id}"), body, &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["name"], "Shifter");
    assert_eq!(json["year"], 1999);
    assert_eq!(json["description"], "Now funny");
    assert_eq!(json["genre"], serde_json::json!([{ "name": "Comedy", "slug": "comedy" }]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn deleting_category_leaves_title_without_category(pool: PgPool) {
    let (_admin, token) = user_with_role(&pool, "root", "admin").await;
    let app = common::build_test_app(pool);
    seed_catalog(&app, &token).await;

    let title = create_title(&app, &token, "Orphan", 2001, "films", &["drama"]).await;
    let id = title["id"].as_i64().unwrap();

    let response = delete_auth(app.clone(), "/api/v1/categories/films", &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let json = expect_json(
        get(app, &format!("/api/v1/titles/{id}")).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["category"], serde_json::Value::Null);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn deleted_title_is_gone(pool: PgPool) {
    let (_admin, token) = user_with_role(&pool, "root", "admin").await;
    let app = common::build_test_app(pool);
    seed_catalog(&app, &token).await;

    let title = create_title(&app, &token, "Ephemeral", 2001, "films", &["drama"]).await;
    let id = title["id"].as_i64().unwrap();

    let response = delete_auth(app.clone(), &format!("/api/v1/titles/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app, &format!("/api/v1/titles/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
