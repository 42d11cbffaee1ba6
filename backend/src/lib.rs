//! FarmHub backend.
//!
//! Credential login, signed session tokens, and admin-gated account creation
//! over a MongoDB user store. [`app`] builds the complete router from an
//! [`AppState`]; `main.rs` wires that to configuration and a listener.

pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod errors;
pub mod middleware;
pub mod state;

use axum::{routing::get, Router};

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .nest("/api/auth", auth::auth_router())
        .nest("/api", api::api_router())
        .layer(middleware::trace_layer())
        .with_state(state)
}

async fn root_handler() -> &'static str {
    "Welcome to FarmHub!"
}
