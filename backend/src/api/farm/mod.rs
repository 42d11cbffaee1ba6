//! Farm listing for the account form's farm selector.

pub mod handlers;

use axum::{routing::get, Router};

use crate::state::AppState;

pub fn farm_router() -> Router<AppState> {
    Router::new().route("/farm", get(handlers::list_farms))
}
