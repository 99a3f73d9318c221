// crates/backend-lib/src/middleware/mod.rs

//! Middleware for the reelsearch auth server.

pub mod rate_limit;

pub use rate_limit::{rate_limit, RateLimitEntry};
