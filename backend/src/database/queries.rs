//! Database query functions (Data Access Objects).
//!
//! This module centralizes all direct store operations. Each one is bounded by
//! the handle's timeout; an elapsed timeout becomes `StoreError::Timeout`,
//! which callers treat as retryable.

use std::future::Future;
use std::sync::atomic::Ordering;

use farmhub_adapters::{FarmRecord, NewUser, StoreError, UserRecord};
use tracing::debug;

use super::Database;

impl Database {
    /// Fetches at most one user by exact email.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let found = self.bounded(self.store.find_user_by_email(email)).await?;
        debug!(found = found.is_some(), "credential lookup");
        Ok(found)
    }

    /// Inserts a new user, first creating the email index if that has not
    /// succeeded yet.
    ///
    /// A timed-out insert may still have been applied by the store. Retrying
    /// it is safe: the unique index turns the repeat into `Duplicate`.
    pub async fn insert_user(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        if !self.indexed.load(Ordering::Acquire) {
            self.ensure_indexes().await?;
        }
        self.bounded(self.store.insert_user(user)).await
    }

    pub async fn list_farms(&self) -> Result<Vec<FarmRecord>, StoreError> {
        self.bounded(self.store.list_farms()).await
    }

    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        self.bounded(self.store.ensure_indexes()).await?;
        if !self.indexed.swap(true, Ordering::AcqRel) {
            debug!("email index confirmed");
        }
        Ok(())
    }

    async fn bounded<T, F>(&self, call: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| StoreError::Timeout(self.timeout))?
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use farmhub_adapters::{MemoryStore, RoleFlags};

    use super::*;

    fn user(email: &str) -> NewUser {
        NewUser {
            name: None,
            email: email.into(),
            password_hash: "h".into(),
            roles: RoleFlags::default(),
            farm: None,
        }
    }

    #[tokio::test]
    async fn slow_store_calls_time_out_as_retryable() {
        let store = Arc::new(MemoryStore::new());
        store.set_latency(Some(Duration::from_millis(200)));
        let db = Database::new(store, Duration::from_millis(20));

        let err = db.find_user_by_email("a@x.com").await.unwrap_err();
        assert!(matches!(err, StoreError::Timeout(_)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn calls_within_the_bound_pass_through() {
        let store = Arc::new(MemoryStore::new());
        let db = Database::new(store.clone(), Duration::from_secs(1));

        db.insert_user(user("a@x.com")).await.unwrap();
        assert!(db.find_user_by_email("a@x.com").await.unwrap().is_some());
        assert!(db.find_user_by_email("b@x.com").await.unwrap().is_none());
        assert_eq!(store.insert_count(), 1);
    }

    #[tokio::test]
    async fn failed_index_creation_is_retried_before_the_next_insert() {
        let store = Arc::new(MemoryStore::new());
        let db = Database::new(store.clone(), Duration::from_secs(1));

        store.set_unavailable(true);
        assert!(db.ensure_indexes().await.is_err());
        assert!(db.insert_user(user("a@x.com")).await.is_err());
        assert_eq!(store.index_builds(), 0);
        assert_eq!(store.insert_count(), 0);

        store.set_unavailable(false);
        db.insert_user(user("a@x.com")).await.unwrap();
        db.insert_user(user("b@x.com")).await.unwrap();
        assert_eq!(store.index_builds(), 1);
        assert_eq!(store.insert_count(), 2);
    }

    #[tokio::test]
    async fn retrying_a_timed_out_insert_reports_the_duplicate() {
        let store = Arc::new(MemoryStore::new());
        let db = Database::new(store.clone(), Duration::from_millis(50));
        db.ensure_indexes().await.unwrap();

        store.set_write_latency(Some(Duration::from_millis(200)));
        let err = db.insert_user(user("a@x.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Timeout(_)));

        store.set_write_latency(None);
        let err = db.insert_user(user("a@x.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
        assert_eq!(store.insert_count(), 1);
    }
}
