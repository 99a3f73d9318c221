// ============================
// crates/backend-lib/src/middleware/rate_limit.rs
// ============================
//! Per-client fixed-window rate limiting.
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::{error::AppError, AppState};

/// Fixed-window request counter for a single client
#[derive(Debug)]
pub struct RateLimitEntry {
    requests: u32,
    window_start: Instant,
}

/// Rate limiter middleware
///
/// Counts requests per client IP in a fixed window sized by configuration.
/// The map entry guard must be released before the handler runs.
pub async fn rate_limit(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // health probes are exempt
    if request.uri().path() == "/health" {
        return Ok(next.run(request).await);
    }

    let client_ip = request
        .headers()
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let window = Duration::from_secs(state.settings.rate_limit.window_secs);
    let max_requests = state.settings.rate_limit.max_requests;

    {
        let mut entry = state
            .rate_limits
            .entry(client_ip)
            .or_insert_with(|| RateLimitEntry {
                requests: 0,
                window_start: Instant::now(),
            });

        if entry.window_start.elapsed() > window {
            entry.requests = 0;
            entry.window_start = Instant::now();
        }

        if entry.requests >= max_requests {
            return Err(AppError::RateLimitExceeded);
        }

        entry.requests += 1;
    }

    Ok(next.run(request).await)
}
