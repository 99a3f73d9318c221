// ============================
// crates/backend-lib/src/auth/service.rs
// ============================
use async_trait::async_trait;
use reelsearch_common::{Claims, RegisterRequest};

use crate::error::AppError;

/// The authentication operations exposed over HTTP
///
/// Every operation is a single-pass request handler; nothing is retried and
/// no per-session state survives a call.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Check credentials and issue a bearer token
    async fn login(&self, email: &str, password: &str) -> Result<String, AppError>;

    /// Create a user record and issue a bearer token for it
    async fn register(&self, request: RegisterRequest) -> Result<String, AppError>;

    /// Verify a raw `Authorization` header value and return the decoded claims
    async fn verify(&self, authorization: &str) -> Result<Claims, AppError>;
}
