use std::sync::Arc;

use crate::auth::{AuthError, AuthService};
use crate::config::Config;
use crate::database::Database;

/// Shared per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Database,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(config: Config, db: Database) -> Result<Self, AuthError> {
        let auth = AuthService::new(db.clone(), &config)?;
        Ok(Self {
            config: Arc::new(config),
            db,
            auth: Arc::new(auth),
        })
    }
}
