//! Module for database connection setup and common utilities.
//!
//! [`Database`] is the process-wide store handle: built once at startup,
//! cloned into request state, and never stored in a global. It wraps the
//! `UserStore` adapter and applies the configured I/O timeout to every call.
//! Inserts are refused until the unique email index is known to exist.

pub mod queries;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use farmhub_adapters::{MongoStore, StoreError, UserStore};
use tracing::{info, warn};

use crate::config::Config;

#[derive(Clone)]
pub struct Database {
    store: Arc<dyn UserStore>,
    timeout: Duration,
    indexed: Arc<AtomicBool>,
}

impl Database {
    pub fn new(store: Arc<dyn UserStore>, timeout: Duration) -> Self {
        Self {
            store,
            timeout,
            indexed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Builds the MongoDB-backed handle and makes sure the email index exists.
    ///
    /// An index failure is logged and tolerated so the server can still start
    /// while the database is briefly unreachable. The next insert retries it.
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        let store = MongoStore::connect(
            &config.mongodb_uri,
            config.mongodb_db.as_deref(),
            config.store_timeout,
        )
        .await?;
        let db = Self::new(Arc::new(store), config.store_timeout);
        match db.ensure_indexes().await {
            Ok(()) => info!("users.email unique index ensured"),
            Err(err) => warn!(error = %err, "could not ensure indexes at startup"),
        }
        Ok(db)
    }
}
