// ============================
// crates/backend-lib/src/routes.rs
// ============================
//! HTTP router and request handlers.
use axum::{
    extract::State,
    http::{header, HeaderMap},
    routing::{get, post},
    Json, Router,
};
use reelsearch_common::{Claims, LoginRequest, RegisterRequest, TokenResponse};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{error::AppError, middleware, AppState};

/// Create the HTTP router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/verify", get(verify).post(verify))
        .route("/health", get(health))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::rate_limit,
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `POST /login`
#[tracing::instrument(skip(state, request))]
async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let token = state.auth.login(&request.email, &request.password).await?;
    Ok(Json(TokenResponse { token }))
}

/// `POST /register`
#[tracing::instrument(skip(state, request))]
async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let token = state.auth.register(request).await?;
    Ok(Json(TokenResponse { token }))
}

/// `GET|POST /verify`
///
/// A missing Authorization header is handled the same as an empty token.
#[tracing::instrument(skip(state, headers))]
async fn verify(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Claims>, AppError> {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    let claims = state.auth.verify(authorization).await?;
    Ok(Json(claims))
}

/// `GET /health`
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
