// ============================
// crates/backend-lib/src/auth/service_impl.rs
// ============================
use ::metrics::counter;
use async_trait::async_trait;
use reelsearch_common::{Claims, RegisterRequest};
use std::sync::Arc;

use crate::auth::{password, AuthService, TokenIssuer};
use crate::error::AppError;
use crate::metrics as keys;
use crate::store::{NewUser, UserStore};
use crate::validation;

/// Length of the `bearer ` scheme prefix in the Authorization header
const BEARER_PREFIX_LEN: usize = 7;

/// Default [`AuthService`] implementation
///
/// Orchestrates the user store, the password hasher and the token issuer.
/// All collaborators arrive through the constructor; nothing is read from
/// the process environment here.
pub struct DefaultAuth {
    store: Arc<dyn UserStore>,
    tokens: TokenIssuer,
    bcrypt_cost: u32,
}

impl DefaultAuth {
    pub fn new(store: Arc<dyn UserStore>, tokens: TokenIssuer, bcrypt_cost: u32) -> Self {
        Self {
            store,
            tokens,
            bcrypt_cost,
        }
    }
}

#[async_trait]
impl AuthService for DefaultAuth {
    async fn login(&self, email: &str, plain_password: &str) -> Result<String, AppError> {
        let user = match self.store.find_by_email(email).await? {
            Some(user) => user,
            None => {
                counter!(keys::LOGIN_FAILURE).increment(1);
                return Err(AppError::UnknownEmail);
            },
        };

        if !password::verify_password(&user.password_hash, plain_password) {
            counter!(keys::LOGIN_FAILURE).increment(1);
            return Err(AppError::InvalidPassword);
        }

        let token = self.tokens.issue(&user)?;
        counter!(keys::LOGIN_SUCCESS).increment(1);
        tracing::debug!(email = %user.email, "login succeeded");
        Ok(token)
    }

    async fn register(&self, mut request: RegisterRequest) -> Result<String, AppError> {
        validation::validate_registration(&request)?;

        if self.store.find_by_email(&request.email).await?.is_some() {
            counter!(keys::REGISTER_FAILURE).increment(1);
            return Err(AppError::EmailTaken);
        }

        let password_hash =
            password::hash_password_secure(&mut request.password, self.bcrypt_cost)?;

        // the store re-checks uniqueness; a concurrent duplicate loses here
        let user = self
            .store
            .insert(NewUser {
                email: request.email,
                username: request.username,
                password_hash,
            })
            .await?;

        let token = self.tokens.issue(&user)?;
        counter!(keys::REGISTER_SUCCESS).increment(1);
        tracing::info!(email = %user.email, "user registered");
        Ok(token)
    }

    async fn verify(&self, authorization: &str) -> Result<Claims, AppError> {
        // the header reads `bearer XXXXX`; everything after the scheme is the token
        let token = authorization
            .get(BEARER_PREFIX_LEN..)
            .unwrap_or_default()
            .trim();

        // clients that lost their token literally send the string "null"
        if token.is_empty() || token == "null" {
            counter!(keys::VERIFY_FAILURE).increment(1);
            return Err(AppError::MissingToken);
        }

        match self.tokens.decode(token) {
            Ok(claims) => {
                counter!(keys::VERIFY_SUCCESS).increment(1);
                Ok(claims)
            },
            Err(e) => {
                counter!(keys::VERIFY_FAILURE).increment(1);
                Err(e)
            },
        }
    }
}
