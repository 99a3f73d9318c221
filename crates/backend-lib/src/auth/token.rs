// ============================
// crates/backend-lib/src/auth/token.rs
// ============================
//! Bearer token issuance and verification (HS256 JWTs).
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use reelsearch_common::Claims;

use crate::error::AppError;
use crate::store::User;

/// Signs and verifies the bearer tokens handed out by login and register
///
/// Holds the derived signing keys; the secret itself is not retained.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

/// Fixed-field projection of a user record into its token claim set
///
/// The claim set carries exactly the fields the frontend reads back from
/// `/verify`; the password hash never crosses this boundary.
pub fn claims_from_user(user: &User, iat: i64, exp: i64) -> Claims {
    Claims {
        email: user.email.clone(),
        username: user.username.clone(),
        created_at: user.created_at,
        updated_at: user.updated_at,
        iat,
        exp,
    }
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs: ttl_secs as i64,
        }
    }

    /// Project claims out of a user record and sign them
    pub fn issue(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now().timestamp();
        let claims = claims_from_user(user, now, now + self.ttl_secs);
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Decode a token, checking signature and expiry
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        Ok(data.claims)
    }
}
