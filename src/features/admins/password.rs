//! bcrypt helpers. Hashing and verification are CPU-bound, so the async
//! wrappers move them onto the blocking pool.

use crate::core::error::{AppError, Result};
use crate::shared::constants::{BCRYPT_COST, BCRYPT_HASH_LENGTH};
use crate::shared::validation::BCRYPT_HASH_REGEX;

/// True when `value` is already an encoded bcrypt hash
pub fn is_bcrypt_hash(value: &str) -> bool {
    value.len() == BCRYPT_HASH_LENGTH && BCRYPT_HASH_REGEX.is_match(value)
}

/// Hash `value` unless it is already a bcrypt hash
pub fn hash_if_plain(value: &str, cost: u32) -> Result<String> {
    if is_bcrypt_hash(value) {
        return Ok(value.to_string());
    }
    bcrypt::hash(value, cost).map_err(|e| {
        tracing::error!("Failed to hash password: {:?}", e);
        AppError::Internal("Failed to hash password".to_string())
    })
}

/// Value to persist in `admins.password`
pub async fn prepare_for_storage(value: String) -> Result<String> {
    if is_bcrypt_hash(&value) {
        return Ok(value);
    }
    tokio::task::spawn_blocking(move || hash_if_plain(&value, BCRYPT_COST))
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
}

/// Check a plain password against a stored hash.
///
/// A malformed stored hash counts as a mismatch.
pub async fn verify(plain: String, hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || match bcrypt::verify(&plain, &hash) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!("Stored admin password hash could not be verified: {:?}", e);
            false
        }
    })
    .await
    .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))
}
