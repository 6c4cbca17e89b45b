//! API integration tests for quantaverse-server.
//!
//! These tests drive the real router with `tower::ServiceExt::oneshot`,
//! using the mock PQC provider and no database. Endpoints that need
//! PostgreSQL answer 503 here; everything in front of the database
//! (validation, challenge handling, token checks) is exercised for real.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use quantaverse_core::{MockPqc, PqcProvider, DILITHIUM2_SIGNATURE_BYTES};
use quantaverse_server::auth::{ChallengeStore, JwtKeys};
use quantaverse_server::{create_router, AppState};

fn create_test_state() -> AppState {
    AppState {
        user_repo: None,
        post_repo: None,
        comment_repo: None,
        challenges: Arc::new(ChallengeStore::new()),
        pqc: Arc::new(MockPqc::default()),
        jwt: Arc::new(JwtKeys::new("test-secret", 24)),
        challenge_ttl_secs: 300,
    }
}

fn create_test_app() -> Router {
    create_router(create_test_state())
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// A base64 blob with the exact size of a Dilithium2 signature.
fn well_shaped_signature() -> String {
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
    BASE64.encode(vec![0u8; DILITHIUM2_SIGNATURE_BYTES])
}

// ============================================================================
// Health & Readiness Tests
// ============================================================================

#[tokio::test]
async fn test_health_endpoint_reports_degraded_without_database() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["pqc_available"], true);
    assert_eq!(json["database_configured"], false);
    assert_eq!(json["service"], "quantaverse-server");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_ready_endpoint_returns_ok() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/ready")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["ready"], true);
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/unknown")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_openapi_spec_is_served() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["info"]["title"], "QuantaVerse API");
}

// ============================================================================
// Registration Validation Tests
// ============================================================================

#[tokio::test]
async fn test_register_rejects_short_username() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            json!({
                "username": "ab",
                "email": "ab@example.com",
                "kyber_public_key": "x",
                "dilithium_public_key": "y"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_register_rejects_bad_email() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            json!({
                "username": "alice",
                "email": "not-an-email",
                "kyber_public_key": "x",
                "dilithium_public_key": "y"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_rejects_wrong_size_keys() {
    let app = create_test_app();

    // Valid base64, wrong decoded length
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            json!({
                "username": "alice",
                "email": "alice@example.com",
                "kyber_public_key": "dG9vLXNob3J0",
                "dilithium_public_key": "dG9vLXNob3J0"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_KEY");
}

#[tokio::test]
async fn test_register_without_database_returns_503() {
    let state = create_test_state();
    let pqc = Arc::clone(&state.pqc);
    let app = create_router(state);

    // Structurally valid mock keys pass everything up to the user insert
    let kyber = pqc.generate_kyber_keypair().await.unwrap();
    let dilithium = pqc.generate_dilithium_keypair().await.unwrap();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            json!({
                "username": "alice",
                "email": "alice@example.com",
                "kyber_public_key": kyber.public_key,
                "dilithium_public_key": dilithium.public_key
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let json = body_json(response).await;
    assert_eq!(json["code"], "SERVICE_UNAVAILABLE");
}

// ============================================================================
// Challenge Verification Tests
// ============================================================================

#[tokio::test]
async fn test_verify_challenge_rejects_malformed_signature() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/verify-challenge",
            json!({
                "user_id": "550e8400-e29b-41d4-a716-446655440000",
                "challenge_id": "abc123",
                "signature": "dG9vLXNob3J0"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_SIGNATURE");
}

#[tokio::test]
async fn test_verify_challenge_rejects_unknown_challenge() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/verify-challenge",
            json!({
                "user_id": "550e8400-e29b-41d4-a716-446655440000",
                "challenge_id": "does-not-exist",
                "signature": well_shaped_signature()
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid or expired challenge");
}

#[tokio::test]
async fn test_verify_challenge_rejects_user_mismatch_and_burns_challenge() {
    let state = create_test_state();
    let challenges = Arc::clone(&state.challenges);
    let app = create_router(state);

    let issued_to = uuid::Uuid::new_v4();
    challenges.store(
        "challenge-1".to_string(),
        issued_to,
        "deadbeef".to_string(),
        300,
    );

    // A different user presents the challenge
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/verify-challenge",
            json!({
                "user_id": uuid::Uuid::new_v4(),
                "challenge_id": "challenge-1",
                "signature": well_shaped_signature()
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Challenge was not issued to this user");

    // The failed attempt consumed the challenge: the rightful user now
    // gets the generic invalid-challenge answer.
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/verify-challenge",
            json!({
                "user_id": issued_to,
                "challenge_id": "challenge-1",
                "signature": well_shaped_signature()
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid or expired challenge");
}

#[tokio::test]
async fn test_login_challenge_without_database_returns_503() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/login-challenge",
            json!({"identifier": "alice"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_logout_is_stateless_ok() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request("POST", "/api/auth/logout", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
}

// ============================================================================
// Session Token Tests
// ============================================================================

#[tokio::test]
async fn test_create_post_requires_token() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/posts",
            json!({"content": "hello"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["code"], "AUTH_ERROR");
}

#[tokio::test]
async fn test_create_post_rejects_garbage_token() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/posts")
                .header("Content-Type", "application/json")
                .header("Authorization", "Bearer not-a-jwt")
                .body(Body::from(json!({"content": "hello"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_rejects_invalid_token() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/refresh",
            json!({"token": "garbage"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Public Read Tests
// ============================================================================

#[tokio::test]
async fn test_feed_without_database_returns_503() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/posts")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_get_post_rejects_non_uuid_id() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/posts/not-a-uuid")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
