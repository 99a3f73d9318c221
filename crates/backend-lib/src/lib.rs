// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Core backend-lib functionality for the reelsearch auth server.

pub mod auth;
pub mod config;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod store;
pub mod validation;

use dashmap::DashMap;
use std::sync::Arc;

use crate::auth::{AuthService, DefaultAuth, TokenIssuer};
use crate::config::Settings;
use crate::middleware::RateLimitEntry;
use crate::store::UserStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth: Arc<dyn AuthService>,
    /// Settings
    pub settings: Arc<Settings>,
    /// Per-client rate limit counters
    pub rate_limits: Arc<DashMap<String, RateLimitEntry>>,
}

impl AppState {
    /// Create application state from a user store and settings
    ///
    /// The token issuer and the auth service are wired here; business logic
    /// below this point never touches configuration sources directly.
    pub fn new(store: Arc<dyn UserStore>, settings: Settings) -> Self {
        let tokens = TokenIssuer::new(&settings.auth.jwt_secret, settings.auth.token_ttl_secs);
        let auth: Arc<dyn AuthService> =
            Arc::new(DefaultAuth::new(store, tokens, settings.auth.bcrypt_cost));

        Self {
            auth,
            settings: Arc::new(settings),
            rate_limits: Arc::new(DashMap::new()),
        }
    }
}
