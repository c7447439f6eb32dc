//! API integration tests.
//!
//! These tests drive the router end to end over a mock database,
//! covering the auth-middleware ladder and the basic route statuses.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::Utc;
use reels_api::{middleware::AppState, router as api_router};
use reels_common::AuthTokens;
use reels_core::{AdminPolicy, CommentService, ReelService, UserService};
use reels_db::{
    entities::{reel, user},
    repositories::{ReelRepository, UserRepository},
};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

const TEST_SECRET: &str = "integration-test-secret";
const REEL_ID: &str = "01hx4k3v9p2q8r7s6t5w4x3y2z";

/// Create test app state over the given connection.
fn create_test_state(db: DatabaseConnection) -> AppState {
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let reel_repo = ReelRepository::new(Arc::clone(&db));

    let user_service = UserService::new(user_repo.clone());
    let reel_service = ReelService::new(
        reel_repo.clone(),
        user_repo,
        AdminPolicy::new(Some("admin".to_string())),
    );
    let comment_service = CommentService::new(reel_repo);

    AppState {
        user_service,
        reel_service,
        comment_service,
        tokens: AuthTokens::new(TEST_SECRET, 3600),
    }
}

/// Create the test router.
fn create_test_router(db: DatabaseConnection) -> Router {
    let state = create_test_state(db);
    api_router(&state).with_state(state)
}

fn make_user(id: &str, username: &str) -> user::Model {
    user::Model {
        id: id.to_string(),
        username: username.to_string(),
        username_lower: username.to_lowercase(),
        name: None,
        password_hash: "$argon2id$unused".to_string(),
        avatar_url: None,
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

fn make_reel(id: &str, author_id: &str) -> reel::Model {
    reel::Model {
        id: id.to_string(),
        author_id: author_id.to_string(),
        title: "title".to_string(),
        description: "description".to_string(),
        text: "text".to_string(),
        likes: json!([]),
        comments: json!([]),
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

fn bearer_for(user_id: &str) -> String {
    let token = AuthTokens::new(TEST_SECRET, 3600).issue(user_id).unwrap();
    format!("Bearer {token}")
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/reels")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Error bodies carry a single message field.
    let body = body_json(response).await;
    assert!(body.get("error").and_then(|e| e.as_str()).is_some());
}

#[tokio::test]
async fn test_malformed_token_is_bad_request() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/reels")
                .method("GET")
                .header("Authorization", "Bearer not.a.token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_token_for_deleted_account_is_unauthorized() {
    // Token verifies, but its subject no longer resolves to a user row.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user::Model>::new()])
        .into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/reels")
                .method("GET")
                .header("Authorization", bearer_for("user1"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_reels_ok() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[make_user("user1", "alice")]])
        .append_query_results([Vec::<reel::Model>::new()])
        .into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/reels")
                .method("GET")
                .header("Authorization", bearer_for("user1"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn test_get_unknown_reel_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[make_user("user1", "alice")]])
        .append_query_results([Vec::<reel::Model>::new()])
        .into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/reels/{REEL_ID}"))
                .method("GET")
                .header("Authorization", bearer_for("user1"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_reel_created_with_expanded_author() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[make_user("user1", "alice")]])
        .append_query_results([[make_reel(REEL_ID, "user1")]])
        .into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/reels")
                .method("POST")
                .header("Authorization", bearer_for("user1"))
                .header("Content-Type", "application/json")
                .body(Body::from(
                    r#"{"title":"title","description":"description","text":"text"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["author"]["username"], "alice");
    assert_eq!(body["likes"], json!([]));
}

#[tokio::test]
async fn test_delete_with_malformed_id_is_bad_request() {
    // Only the middleware's user fetch runs; the ID never reaches the store.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[make_user("user1", "alice")]])
        .into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/reels/not-a-valid-id")
                .method("DELETE")
                .header("Authorization", bearer_for("user1"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_delete_all_forbidden_for_non_admin() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[make_user("user1", "mallory")]])
        .into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/reels/admin/delete-all")
                .method("DELETE")
                .header("Authorization", bearer_for("user1"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_comment_routes_404_on_unknown_reel() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[make_user("user1", "alice")]])
        .append_query_results([Vec::<reel::Model>::new()])
        .into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/reels/{REEL_ID}/comments"))
                .method("POST")
                .header("Authorization", bearer_for("user1"))
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"text":"hello"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_signup_with_invalid_json_returns_error() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/signup")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from("invalid json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(
        response.status() == StatusCode::BAD_REQUEST
            || response.status() == StatusCode::UNPROCESSABLE_ENTITY
    );
}

#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/nonexistent/endpoint")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
