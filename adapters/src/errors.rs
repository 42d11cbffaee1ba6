//! Custom error types specific to the `adapters` crate.
//!
//! These errors cover everything that can go wrong talking to the persistent
//! store. They deliberately carry no user data beyond the offending key.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached or rejected the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store operation timed out after {0:?}")]
    Timeout(Duration),

    /// A unique key (the user email) already exists.
    #[error("duplicate key: {0}")]
    Duplicate(String),

    /// A stored document could not be decoded into a record.
    #[error("malformed record: {0}")]
    Malformed(String),
}

impl StoreError {
    /// Whether the caller may reasonably retry the same operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_) | StoreError::Timeout(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_infrastructure_failures_are_retryable() {
        assert!(StoreError::Unavailable("down".into()).is_retryable());
        assert!(StoreError::Timeout(Duration::from_millis(5)).is_retryable());
        assert!(!StoreError::Duplicate("a@x.com".into()).is_retryable());
        assert!(!StoreError::Malformed("bad _id".into()).is_retryable());
    }
}
