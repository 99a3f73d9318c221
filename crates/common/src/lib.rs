// ================
// crates/common/src/lib.rs
// ================
//! Wire types shared between the reelsearch client and the auth backend.
//! This module defines the request/response bodies of the authentication
//! endpoints and the claim set embedded in bearer tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of a `POST /login` request
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginRequest {
    /// Email the account was registered under
    pub email: String,
    /// Plaintext password, verified against the stored hash
    pub password: String,
}

/// Body of a `POST /register` request
///
/// Clients may send additional profile fields; anything outside the typed
/// schema is ignored by the server.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RegisterRequest {
    /// Email, unique across all accounts
    pub email: String,
    /// Display name
    pub username: String,
    /// Plaintext password, hashed before storage
    pub password: String,
}

/// Successful response of `POST /login` and `POST /register`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TokenResponse {
    /// Signed bearer token
    pub token: String,
}

/// Machine-readable error payload
///
/// `field` names the offending request field for credential and validation
/// errors; it is omitted for errors that are not tied to a single field.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

/// Claim set embedded in a bearer token
///
/// The first four fields are a fixed projection of the user record taken at
/// issuance time; `iat`/`exp` are stamped by the token service. Timestamp
/// field names use the camelCase the frontend expects.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Claims {
    pub email: String,
    pub username: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    /// Issued-at, seconds since the epoch
    pub iat: i64,
    /// Expiry, seconds since the epoch
    pub exp: i64,
}
