use axum::{routing::post, Router};

use super::handlers::{create_account, create_user_account};
use crate::state::AppState;

pub fn user_router() -> Router<AppState> {
    Router::new()
        .route("/create/user/{role}", post(create_user_account))
        .route("/create/{account_type}", post(create_account))
}
