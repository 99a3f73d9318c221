// ==========================
// crates/backend-lib/tests/auth_flow.rs
// ==========================
//! Black-box tests driving the real router over in-memory storage.
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use std::sync::Arc;
use tower::ServiceExt;

use backend_lib::{config::Settings, routes::create_router, store::InMemoryUserStore, AppState};
use reelsearch_common::Claims;

const TEST_SECRET: &str = "integration-test-secret";

fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.auth.jwt_secret = TEST_SECRET.to_string();
    // minimum bcrypt cost keeps the suite fast
    settings.auth.bcrypt_cost = 4;
    settings
}

fn test_router() -> Router {
    let store = Arc::new(InMemoryUserStore::new());
    create_router(Arc::new(AppState::new(store, test_settings())))
}

fn registration(email: &str) -> serde_json::Value {
    serde_json::json!({
        "email": email,
        "username": "moviefan",
        "password": "hunter2hunter2",
    })
}

async fn read_json(response: axum::response::Response) -> (StatusCode, serde_json::Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn post_json(
    app: &Router,
    path: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    read_json(app.clone().oneshot(request).await.unwrap()).await
}

async fn get_verify(
    app: &Router,
    authorization: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method("GET").uri("/verify");
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    let request = builder.body(Body::empty()).unwrap();

    read_json(app.clone().oneshot(request).await.unwrap()).await
}

#[tokio::test]
async fn test_register_returns_token() {
    let app = test_router();

    let (status, body) = post_json(&app, "/register", registration("a@example.com")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().map(|t| !t.is_empty()).unwrap_or(false));
}

#[tokio::test]
async fn test_register_duplicate_email_rejected() {
    let app = test_router();

    let (status, _) = post_json(&app, "/register", registration("a@example.com")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post_json(&app, "/register", registration("a@example.com")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "email");
    assert_eq!(body["message"], "Email already taken");
}

#[tokio::test]
async fn test_register_then_login() {
    let app = test_router();
    post_json(&app, "/register", registration("a@example.com")).await;

    let (status, body) = post_json(
        &app,
        "/login",
        serde_json::json!({ "email": "a@example.com", "password": "hunter2hunter2" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap();

    // the token decodes with the configured secret and carries the record
    let decoded = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(TEST_SECRET.as_bytes()),
        &Validation::default(),
    )
    .unwrap();
    assert_eq!(decoded.claims.email, "a@example.com");
    assert_eq!(decoded.claims.username, "moviefan");
}

#[tokio::test]
async fn test_login_unknown_email() {
    let app = test_router();

    let (status, body) = post_json(
        &app,
        "/login",
        serde_json::json!({ "email": "nobody@example.com", "password": "whatever" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["field"], "email");
    assert_eq!(body["message"], "Invalid email");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = test_router();
    post_json(&app, "/register", registration("a@example.com")).await;

    let (status, body) = post_json(
        &app,
        "/login",
        serde_json::json!({ "email": "a@example.com", "password": "not-the-password" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "password");
    assert_eq!(body["message"], "Invalid password");
}

#[tokio::test]
async fn test_verify_returns_claims_embedded_at_issuance() {
    let app = test_router();

    let (_, body) = post_json(&app, "/register", registration("a@example.com")).await;
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = get_verify(&app, Some(&format!("bearer {token}"))).await;
    assert_eq!(status, StatusCode::OK);

    // field-for-field equality with the claims signed into the token
    let returned: Claims = serde_json::from_value(body).unwrap();
    let issued = jsonwebtoken::decode::<Claims>(
        &token,
        &DecodingKey::from_secret(TEST_SECRET.as_bytes()),
        &Validation::default(),
    )
    .unwrap()
    .claims;

    assert_eq!(returned, issued);
    assert_eq!(returned.email, "a@example.com");
    assert_eq!(returned.username, "moviefan");
    assert_eq!(returned.created_at, returned.updated_at);
}

#[tokio::test]
async fn test_verify_accepts_post() {
    let app = test_router();

    let (_, body) = post_json(&app, "/register", registration("a@example.com")).await;
    let token = body["token"].as_str().unwrap().to_string();

    let request = Request::builder()
        .method("POST")
        .uri("/verify")
        .header(header::AUTHORIZATION, format!("bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = read_json(app.clone().oneshot(request).await.unwrap()).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_verify_missing_token() {
    let app = test_router();

    // no header at all
    let (status, body) = get_verify(&app, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "No token provided");
    assert!(body.get("field").is_none());

    // empty after the scheme prefix
    let (status, _) = get_verify(&app, Some("bearer    ")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // the literal placeholder clients send when they lost their token
    let (status, body) = get_verify(&app, Some("bearer null")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "No token provided");
}

#[tokio::test]
async fn test_verify_tampered_token() {
    let app = test_router();

    let (_, body) = post_json(&app, "/register", registration("a@example.com")).await;
    let mut token = body["token"].as_str().unwrap().to_string();

    let last = token.pop().unwrap();
    token.push(if last == 'A' { 'B' } else { 'A' });

    let (status, body) = get_verify(&app, Some(&format!("bearer {token}"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
async fn test_verify_expired_token() {
    let app = test_router();
    post_json(&app, "/register", registration("a@example.com")).await;

    // hand-craft a token signed with the right secret but long expired
    let now = chrono::Utc::now();
    let claims = Claims {
        email: "a@example.com".to_string(),
        username: "moviefan".to_string(),
        created_at: now,
        updated_at: now,
        iat: now.timestamp() - 7200,
        exp: now.timestamp() - 3600,
    };
    let token = jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();

    let (status, _) = get_verify(&app, Some(&format!("bearer {token}"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_validation_errors() {
    let app = test_router();

    let (status, body) = post_json(
        &app,
        "/register",
        serde_json::json!({ "email": "not-an-email", "username": "x", "password": "hunter2hunter2" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "email");

    let (status, body) = post_json(
        &app,
        "/register",
        serde_json::json!({ "email": "b@example.com", "username": "x", "password": "short" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "password");
}

#[tokio::test]
async fn test_rate_limit_kicks_in() {
    let mut settings = test_settings();
    settings.rate_limit.max_requests = 3;

    let store = Arc::new(InMemoryUserStore::new());
    let app = create_router(Arc::new(AppState::new(store, settings)));

    for _ in 0..3 {
        let (status, _) = get_verify(&app, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    let (status, _) = get_verify(&app, None).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_health_is_exempt_from_rate_limiting() {
    let mut settings = test_settings();
    settings.rate_limit.max_requests = 1;

    let store = Arc::new(InMemoryUserStore::new());
    let app = create_router(Arc::new(AppState::new(store, settings)));

    for _ in 0..5 {
        let request = Request::builder()
            .method("GET")
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let (status, body) = read_json(app.clone().oneshot(request).await.unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
