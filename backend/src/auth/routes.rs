//! Defines the HTTP routes specifically for authentication.
//!
//! These routes handle login, session introspection, token renewal and logout.
//! They are designed to be nested under `/api/auth` in the main Axum router.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{login, logout, refresh, session};
use crate::state::AppState;

pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/session", get(session))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
}
