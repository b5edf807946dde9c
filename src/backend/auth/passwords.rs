/**
 * Password Hashing
 *
 * bcrypt hashing and verification. Both are CPU-bound, so they run on the
 * blocking thread pool instead of stalling the async workers.
 */

use crate::backend::error::BackendError;

/// Hash a password with the given bcrypt cost.
pub async fn hash_password(password: String, cost: u32) -> Result<String, BackendError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| BackendError::internal("Password hashing task failed", e))?
        .map_err(|e| {
            tracing::error!("Failed to hash password: {:?}", e);
            BackendError::internal("Failed to hash password", e)
        })
}

/// Check a password against a stored hash.
pub async fn verify_password(password: String, hash: String) -> Result<bool, BackendError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| BackendError::internal("Password verification task failed", e))?
        .map_err(|e| {
            tracing::error!("Failed to verify password: {:?}", e);
            BackendError::internal("Failed to verify password", e)
        })
}
