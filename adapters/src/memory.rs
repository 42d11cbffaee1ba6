//! In-process implementation of `UserStore`.
//!
//! Backed by a `parking_lot::RwLock` map keyed by email. Ids are sequential
//! hex strings. The store can be switched into an "unavailable" mode, and can
//! be given an artificial latency, to exercise error handling in callers.
//! Write latency applies after the write, so a caller that gives up early
//! leaves the record stored.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::errors::StoreError;
use crate::models::{FarmId, FarmRecord, NewUser, UserId, UserRecord};
use crate::UserStore;

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, UserRecord>>,
    farms: RwLock<Vec<FarmRecord>>,
    next_id: AtomicU64,
    unavailable: AtomicBool,
    latency: RwLock<Option<Duration>>,
    write_latency: RwLock<Option<Duration>>,
    inserts: AtomicU64,
    index_builds: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a farm and returns its id.
    pub fn add_farm(&self, name: impl Into<String>) -> FarmId {
        let id = FarmId(self.allocate_id());
        self.farms.write().push(FarmRecord {
            id: id.clone(),
            name: name.into(),
        });
        id
    }

    /// Makes every subsequent call fail with `StoreError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Delays every subsequent call by `latency`.
    pub fn set_latency(&self, latency: Option<Duration>) {
        *self.latency.write() = latency;
    }

    /// Delays the acknowledgement of every subsequent insert. The record is
    /// stored before the delay starts.
    pub fn set_write_latency(&self, latency: Option<Duration>) {
        *self.write_latency.write() = latency;
    }

    /// Number of successful inserts so far.
    pub fn insert_count(&self) -> u64 {
        self.inserts.load(Ordering::SeqCst)
    }

    /// Number of successful `ensure_indexes` calls so far.
    pub fn index_builds(&self) -> u64 {
        self.index_builds.load(Ordering::SeqCst)
    }

    fn allocate_id(&self) -> String {
        format!("{:024x}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    async fn enter(&self) -> Result<(), StoreError> {
        let latency = *self.latency.read();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store switched off".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        self.enter().await?;
        Ok(self.users.read().get(email).cloned())
    }

    async fn insert_user(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        self.enter().await?;
        let record = {
            let mut users = self.users.write();
            if users.contains_key(&user.email) {
                return Err(StoreError::Duplicate(user.email));
            }
            let record = user.into_record(UserId(self.allocate_id()));
            users.insert(record.email.clone(), record.clone());
            record
        };
        self.inserts.fetch_add(1, Ordering::SeqCst);

        let write_latency = *self.write_latency.read();
        if let Some(latency) = write_latency {
            tokio::time::sleep(latency).await;
        }
        Ok(record)
    }

    async fn list_farms(&self) -> Result<Vec<FarmRecord>, StoreError> {
        self.enter().await?;
        let mut farms = self.farms.read().clone();
        farms.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(farms)
    }

    async fn ensure_indexes(&self) -> Result<(), StoreError> {
        self.enter().await?;
        self.index_builds.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
