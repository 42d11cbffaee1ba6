//! Custom error types specific to authentication failures.
//!
//! This module defines the failure taxonomy of the login and session pipeline.
//! The variants stay distinct internally so they can be logged precisely;
//! `errors::AppError` collapses them before anything reaches a client.

use farmhub_adapters::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// No user record for the supplied email.
    #[error("no account for the supplied email")]
    NotFound,

    /// The password did not match the stored hash.
    #[error("password mismatch")]
    InvalidCredential,

    /// Token missing, malformed, expired, or signed with another key.
    #[error("invalid session: {0}")]
    InvalidSession(String),

    /// A valid session lacks the capability an action requires.
    #[error("session lacks the required capability")]
    Forbidden,

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Hashing or token signing failed on the server side.
    #[error("credential processing failed: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn invalid_session(reason: impl Into<String>) -> Self {
        AuthError::InvalidSession(reason.into())
    }
}
