//! Handler functions for account management endpoints.
//!
//! Account creation is admin-only. The gate runs before the body is even
//! inspected, so an unauthorized caller learns nothing and writes nothing.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use farmhub_adapters::NewUser;
use tracing::info;

use super::models::{AccountKind, AccountView, CreateAccountRequest};
use crate::auth::{authorize, Capability, CurrentSession, Session};
use crate::errors::AppError;
use crate::state::AppState;

type Created = (StatusCode, Json<AccountView>);

/// `POST /api/create/{account_type}` for admin, manager and director accounts.
pub async fn create_account(
    State(state): State<AppState>,
    current: CurrentSession,
    Path(account_type): Path<String>,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Result<Created, AppError> {
    let actor = authorize(current.session(), Capability::Admin)?;
    let kind = AccountKind::from_account_type(&account_type).ok_or_else(|| {
        AppError::MalformedPayload(format!("unknown account type: {account_type}"))
    })?;
    create(&state, actor, kind, payload).await
}

/// `POST /api/create/user/{role}` for seller and feed accounts.
pub async fn create_user_account(
    State(state): State<AppState>,
    current: CurrentSession,
    Path(role): Path<String>,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Result<Created, AppError> {
    let actor = authorize(current.session(), Capability::Admin)?;
    let kind = AccountKind::from_user_role(&role)
        .ok_or_else(|| AppError::MalformedPayload(format!("invalid user role: {role}")))?;
    create(&state, actor, kind, payload).await
}

async fn create(
    state: &AppState,
    actor: &Session,
    kind: AccountKind,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Result<Created, AppError> {
    let Json(request) = payload.map_err(|e| AppError::MalformedPayload(e.body_text()))?;
    request.validate().map_err(|msg| AppError::MalformedPayload(msg.to_string()))?;

    let password_hash = state.auth.hash_password(&request.password).await?;
    let user = state
        .db
        .insert_user(NewUser {
            name: Some(request.name.trim().to_string()),
            email: request.email.trim().to_string(),
            password_hash,
            roles: kind.roles(),
            farm: request.farm(),
        })
        .await?;

    info!(actor = %actor.claims.id, user_id = %user.id, ?kind, "account created");
    Ok((StatusCode::CREATED, Json(AccountView::from(&user))))
}
