//! HTTP behaviour that does not depend on database contents.
//!
//! These run against a lazily-connected pool that never reaches a server:
//! every request here is answered (or rejected) before a query is issued,
//! except `/health`, which reports the unreachable database as degraded.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get, get_auth, post_json};
use tower::ServiceExt;

#[tokio::test]
async fn health_reports_degraded_without_database() {
    let app = common::build_test_app(common::lazy_pool());
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["db_healthy"], false);
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn response_carries_request_id() {
    let app = common::build_test_app(common::lazy_pool());
    let response = get(app, "/this-route-does-not-exist").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("x-request-id header must be set")
        .to_str()
        .unwrap();
    assert_eq!(request_id.len(), 36);
}

#[tokio::test]
async fn unknown_route_returns_json_404() {
    let app = common::build_test_app(common::lazy_pool());
    let response = get(app, "/api/v1/nothing-here").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn unsupported_method_returns_405() {
    let app = common::build_test_app(common::lazy_pool());
    let request = Request::builder()
        .method(Method::PUT)
        .uri("/api/v1/titles")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// ---------------------------------------------------------------------------
// Authentication rejections
// ---------------------------------------------------------------------------

#[tokio::test]
async fn profile_requires_token() {
    let app = common::build_test_app(common::lazy_pool());
    let response = get(app, "/api/v1/users/me").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn malformed_authorization_header_is_rejected() {
    let app = common::build_test_app(common::lazy_pool());
    let request = Request::builder()
        .uri("/api/v1/users/me")
        .header("authorization", "Token abc")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn forged_token_is_rejected() {
    let app = common::build_test_app(common::lazy_pool());
    let response = get_auth(app, "/api/v1/users", "eyJhbGciOiJIUzI1NiJ9.e30.bad").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_write_without_token_is_unauthorized() {
    let app = common::build_test_app(common::lazy_pool());
    let body = serde_json::json!({ "name": "Films", "slug": "films" });
    let response = post_json(app, "/api/v1/categories", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn review_creation_without_token_is_unauthorized() {
    let app = common::build_test_app(common::lazy_pool());
    let body = serde_json::json!({ "text": "Great", "score": 9 });
    let response = post_json(app, "/api/v1/titles/1/reviews", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Path and query rejections
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_numeric_title_id_uses_error_envelope() {
    let app = common::build_test_app(common::lazy_pool());
    let response = get(app, "/api/v1/titles/abc").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].as_str().unwrap().contains("abc"));
}

#[tokio::test]
async fn non_numeric_review_id_uses_error_envelope() {
    let app = common::build_test_app(common::lazy_pool());
    let response = get(app, "/api/v1/titles/1/reviews/latest").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn non_numeric_limit_uses_error_envelope() {
    let app = common::build_test_app(common::lazy_pool());
    let response = get(app, "/api/v1/categories?limit=abc").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn non_numeric_year_filter_uses_error_envelope() {
    let app = common::build_test_app(common::lazy_pool());
    let response = get(app, "/api/v1/titles?year=recent").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

// ---------------------------------------------------------------------------
// Body validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_json_uses_error_envelope() {
    let app = common::build_test_app(common::lazy_pool());
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/auth/signup")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn token_request_missing_code_is_400() {
    let app = common::build_test_app(common::lazy_pool());
    let body = serde_json::json!({ "username": "alice" });
    let response = post_json(app, "/api/v1/auth/token", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn signup_with_reserved_username_is_400() {
    let app = common::build_test_app(common::lazy_pool());
    let body = serde_json::json!({ "username": "me", "email": "me@example.com" });
    let response = post_json(app, "/api/v1/auth/signup", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn signup_with_invalid_email_is_400() {
    let app = common::build_test_app(common::lazy_pool());
    let body = serde_json::json!({ "username": "alice", "email": "not-an-email" });
    let response = post_json(app, "/api/v1/auth/signup", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn signup_with_dotless_email_domain_is_400() {
    let app = common::build_test_app(common::lazy_pool());
    let body = serde_json::json!({ "username": "critic", "email": "critic@localhost" });
    let response = post_json(app, "/api/v1/auth/signup", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}
