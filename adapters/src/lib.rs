//! Core `adapters` crate for abstracting the persistent user store.
//!
//! This crate defines the `UserStore` trait, which outlines the handful of
//! document operations the backend needs (credential lookup, account insert,
//! farm listing), and provides the concrete implementations: `MongoStore` for
//! production and `MemoryStore` for tests and local experimentation.

pub mod errors;
pub mod memory;
pub mod models;
pub mod mongo;

pub use errors::StoreError;
pub use memory::MemoryStore;
pub use models::{FarmId, FarmRecord, NewUser, RoleFlags, UserId, UserRecord};
pub use mongo::MongoStore;

use async_trait::async_trait;

/// Read/write access to user and farm records.
///
/// Implementations must be safe to share across concurrent requests; the
/// backend holds a single `Arc<dyn UserStore>` for the life of the process.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Looks up a user by exact email. Absence is `Ok(None)`, not an error.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Inserts a new user and returns the stored record.
    ///
    /// Fails with `StoreError::Duplicate` when the email is already taken.
    async fn insert_user(&self, user: NewUser) -> Result<UserRecord, StoreError>;

    /// Lists every farm, ordered by name.
    async fn list_farms(&self) -> Result<Vec<FarmRecord>, StoreError>;

    /// Creates whatever indexes the store relies on. Idempotent.
    async fn ensure_indexes(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
