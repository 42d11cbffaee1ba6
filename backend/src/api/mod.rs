//! Central module for organizing the application's main API endpoints.
//!
//! This module acts as a top-level container for the API domains outside core
//! authentication: account management and farm listing. Authentication routes
//! are handled separately in `auth`.

pub mod farm;
pub mod user;

use axum::Router;

use crate::state::AppState;

pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(user::routes::user_router())
        .merge(farm::farm_router())
}
