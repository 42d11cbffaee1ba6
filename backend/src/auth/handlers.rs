//! Handler functions for authentication-related API endpoints.
//!
//! These functions process incoming HTTP requests for login, session
//! introspection, token renewal and logout. They parse request data and
//! delegate to `auth::service`. Failures are returned as `AppError`, which
//! hides which step of the pipeline rejected the request.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use tracing::info;

use super::claims::session_view;
use super::gate::{authorize, Capability};
use super::middleware::CurrentSession;
use super::models::{IssuedToken, LoginRequest, LoginResponse, SessionView};
use crate::config::Config;
use crate::errors::AppError;
use crate::state::AppState;

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload.map_err(|e| AppError::MalformedPayload(e.body_text()))?;
    let issued = state.auth.login(&request.email, &request.password).await?;
    issued_response(&state.config, &issued)
}

pub async fn session(current: CurrentSession) -> Result<Json<SessionView>, AppError> {
    let session = authorize(current.session(), Capability::Authenticated)?;
    Ok(Json(session_view(session)))
}

pub async fn refresh(
    State(state): State<AppState>,
    current: CurrentSession,
) -> Result<impl IntoResponse, AppError> {
    let session = authorize(current.session(), Capability::Authenticated)?;
    let issued = state.auth.renew(session)?;
    issued_response(&state.config, &issued)
}

pub async fn logout(
    State(state): State<AppState>,
    current: CurrentSession,
) -> Result<impl IntoResponse, AppError> {
    if let Some(session) = current.session() {
        info!(user_id = %session.claims.id, "logout");
    }
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, clear_session_cookie(&state.config)?);
    Ok((headers, Json(json!({ "status": "ok" }))))
}

fn issued_response(config: &Config, issued: &IssuedToken) -> Result<impl IntoResponse, AppError> {
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, session_cookie(config, &issued.token)?);
    Ok((headers, Json(LoginResponse::from(issued))))
}

pub fn session_cookie(config: &Config, token: &str) -> Result<HeaderValue, AppError> {
    cookie(config, token, config.session_ttl.as_secs())
}

pub fn clear_session_cookie(config: &Config) -> Result<HeaderValue, AppError> {
    cookie(config, "", 0)
}

fn cookie(config: &Config, value: &str, max_age: u64) -> Result<HeaderValue, AppError> {
    let secure = if config.cookie_secure { "; Secure" } else { "" };
    HeaderValue::from_str(&format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}{}",
        config.cookie_name, value, max_age, secure
    ))
    .map_err(|e| AppError::Internal(format!("invalid cookie header: {e}")))
}
