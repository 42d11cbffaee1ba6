//! Password hashing and verification with bcrypt.
//!
//! Both operations are deliberately slow, so they run on tokio's blocking
//! pool. Plaintext passwords are only ever borrowed for the duration of a
//! call and are never logged.

use tracing::warn;

use super::errors::AuthError;

const DECOY_PLAINTEXT: &str = "farmhub-decoy-password";

/// Synchronous check. A stored value that is not a bcrypt hash never matches.
pub fn verify_blocking(candidate: &str, stored_hash: &str) -> bool {
    match bcrypt::verify(candidate, stored_hash) {
        Ok(matched) => matched,
        Err(err) => {
            warn!(error = %err, "stored password hash is not valid bcrypt");
            false
        }
    }
}

pub struct PasswordVerifier {
    cost: u32,
    decoy_hash: String,
}

impl PasswordVerifier {
    /// Computes the decoy hash up front; this blocks for one hash at `cost`.
    pub fn new(cost: u32) -> Result<Self, AuthError> {
        let decoy_hash = bcrypt::hash(DECOY_PLAINTEXT, cost)
            .map_err(|e| AuthError::Internal(format!("bcrypt setup failed: {e}")))?;
        Ok(Self { cost, decoy_hash })
    }

    pub async fn verify(&self, candidate: &str, stored_hash: &str) -> Result<bool, AuthError> {
        let candidate = candidate.to_owned();
        let stored_hash = stored_hash.to_owned();
        tokio::task::spawn_blocking(move || verify_blocking(&candidate, &stored_hash))
            .await
            .map_err(|e| AuthError::Internal(format!("password verification task failed: {e}")))
    }

    /// Spends one verification's worth of work against the decoy hash.
    ///
    /// Used when the email is unknown, so that path costs about as much as a
    /// wrong password. The result is discarded.
    pub async fn verify_decoy(&self, candidate: &str) -> Result<(), AuthError> {
        self.verify(candidate, &self.decoy_hash).await.map(|_| ())
    }

    pub async fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        let plaintext = plaintext.to_owned();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, cost))
            .await
            .map_err(|e| AuthError::Internal(format!("password hashing task failed: {e}")))?
            .map_err(|e| AuthError::Internal(format!("password hashing failed: {e}")))
    }
}
