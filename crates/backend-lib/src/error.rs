// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reelsearch_common::ErrorBody;
use thiserror::Error;

use crate::validation::ValidationError;

/// Application error types
///
/// Credential errors carry the request field they are reported against so
/// the client can attach the message to the right form input. Token
/// verification failures convert straight from the JWT library via `?`;
/// nothing in the request flow recovers from them.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid email")]
    UnknownEmail,

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Email already taken")]
    EmailTaken,

    #[error("No token provided")]
    MissingToken,

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::UnknownEmail | AppError::MissingToken | AppError::Token(_) => {
                StatusCode::UNAUTHORIZED
            },
            AppError::InvalidPassword | AppError::EmailTaken | AppError::Validation(_) => {
                StatusCode::BAD_REQUEST
            },
            AppError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Name of the request field this error is reported against, if any
    pub fn field(&self) -> Option<&'static str> {
        match self {
            AppError::UnknownEmail | AppError::EmailTaken => Some("email"),
            AppError::InvalidPassword => Some("password"),
            AppError::Validation(e) => Some(e.field()),
            _ => None,
        }
    }

    /// Get a message suitable for sending to the client
    ///
    /// Internal failures are reported with a fixed string; the details are
    /// logged server-side only.
    pub fn public_message(&self) -> String {
        match self {
            AppError::UnknownEmail
            | AppError::InvalidPassword
            | AppError::EmailTaken
            | AppError::MissingToken
            | AppError::Validation(_) => self.to_string(),
            AppError::Token(_) => "Invalid token".to_string(),
            AppError::RateLimitExceeded => {
                "Rate limit exceeded, please try again later".to_string()
            },
            _ => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }

        let body = ErrorBody {
            field: self.field().map(str::to_string),
            message: self.public_message(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Internal(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Internal(msg.to_string())
    }
}
