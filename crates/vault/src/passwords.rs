//! bcrypt hashing and verification of view passwords.
//!
//! bcrypt is CPU-bound by construction; both operations run on tokio's
//! blocking pool so a burst of password attempts never stalls the executor.

use async_trait::async_trait;
use domain::{PasswordHash, PasswordVerifier, VaultError};
use tracing::debug;

/// Work factor used when the configuration does not set one.
pub const DEFAULT_COST: u32 = 12;

/// [`PasswordVerifier`] backed by bcrypt.
#[derive(Debug, Clone, Copy, Default)]
pub struct BcryptVerifier;

#[async_trait]
impl PasswordVerifier for BcryptVerifier {
    async fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, VaultError> {
        let password = password.to_owned();
        let hash = hash.as_str().to_owned();
        let outcome = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|err| VaultError::Worker(err.to_string()))?;
        match outcome {
            Ok(matches) => Ok(matches),
            Err(err) => {
                debug!(error = %err, "stored password hash rejected by bcrypt");
                Err(VaultError::MalformedHash(err.to_string()))
            }
        }
    }
}

/// Hashes a new view password with a fresh salt.
///
/// # Errors
///
/// [`VaultError::MalformedHash`] if `cost` is outside bcrypt's accepted range.
pub async fn hash_password(password: &str, cost: u32) -> Result<PasswordHash, VaultError> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|err| VaultError::Worker(err.to_string()))?
        .map(PasswordHash::new)
        .map_err(|err| VaultError::MalformedHash(err.to_string()))
}
