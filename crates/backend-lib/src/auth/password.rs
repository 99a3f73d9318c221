// ============================
// crates/backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use zeroize::Zeroize;

use crate::error::AppError;

/// Default bcrypt cost factor, used when configuration does not override it
pub const DEFAULT_BCRYPT_COST: u32 = bcrypt::DEFAULT_COST;

/// Hash a password using bcrypt with the given cost factor
pub fn hash_password(plain: &str, cost: u32) -> Result<String, AppError> {
    Ok(bcrypt::hash(plain, cost)?)
}

/// Verify a password against a stored hash
///
/// An unparsable hash counts as a mismatch rather than an error.
pub fn verify_password(hash: &str, plain: &str) -> bool {
    bcrypt::verify(plain, hash).unwrap_or(false)
}

/// Hash a password and zeroize the plaintext
pub fn hash_password_secure(plain: &mut String, cost: u32) -> Result<String, AppError> {
    let hash = hash_password(plain, cost)?;
    plain.zeroize();
    Ok(hash)
}
