//! Global application error types and handlers.
//!
//! `AppError` is the single error type HTTP handlers return. Its
//! `IntoResponse` impl is where internal failures get collapsed into the
//! small set of messages a client may see: credential failures are
//! indistinguishable from each other, session failures all read "please log
//! in again", and infrastructure failures never leak their cause.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use farmhub_adapters::StoreError;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::auth::AuthError;

pub const INVALID_CREDENTIALS: &str = "invalid credentials";
pub const SESSION_REQUIRED: &str = "please log in again";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("please log in again")]
    SessionRequired,

    #[error("forbidden")]
    Forbidden,

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("conflict: {0}")]
    Conflict(String),

    /// Retryable infrastructure failure.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials | AppError::SessionRequired => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::SessionRequired => "invalid_session",
            AppError::Forbidden => "forbidden",
            AppError::MalformedPayload(_) => "malformed_payload",
            AppError::Conflict(_) => "conflict",
            AppError::Unavailable(_) => "unavailable",
            AppError::Internal(_) => "internal_error",
        }
    }

    fn public_message(&self) -> String {
        match self {
            AppError::InvalidCredentials => INVALID_CREDENTIALS.into(),
            AppError::SessionRequired => SESSION_REQUIRED.into(),
            AppError::Forbidden => "you are not allowed to perform this action".into(),
            AppError::MalformedPayload(detail) | AppError::Conflict(detail) => detail.clone(),
            AppError::Unavailable(_) => "service temporarily unavailable, please retry".into(),
            AppError::Internal(_) => "internal server error".into(),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::NotFound | AuthError::InvalidCredential => AppError::InvalidCredentials,
            AuthError::InvalidSession(_) => AppError::SessionRequired,
            AuthError::Forbidden => AppError::Forbidden,
            AuthError::Store(store) => store.into(),
            AuthError::Internal(detail) => AppError::Internal(detail),
        }
    }
}

/// Timeouts stay retryable for writes too. An account insert that timed out
/// may have been stored, in which case the client's retry gets 409.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(_) => {
                AppError::Conflict("an account with this email already exists".into())
            }
            err if err.is_retryable() => AppError::Unavailable(err.to_string()),
            err => AppError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Unavailable(detail) => warn!(%detail, "store unavailable"),
            AppError::Internal(detail) => error!(%detail, "request failed"),
            _ => {}
        }
        let body = ErrorBody {
            error: self.code(),
            message: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}
