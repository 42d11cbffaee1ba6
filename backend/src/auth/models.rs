//! Data structures for authentication-related entities.
//!
//! This module defines the login payloads, the JWT claims carried inside a
//! session token, the decoded session, and the client-facing session view.
//! None of these types has a field that could hold a password hash.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The identity and role data a session carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub id: String,
    pub email: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}

/// Wire form of a token payload: the session claims plus registered claims.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct TokenClaims {
    #[serde(flatten)]
    pub claims: SessionClaims,
    pub iat: u64,
    pub exp: u64,
}

/// A verified, unexpired session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub claims: SessionClaims,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// A freshly signed token together with the session it encodes.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub session: Session,
}

/// What `GET /api/auth/session` returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub user: SessionClaims,
    pub expires: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires: String,
    pub user: SessionClaims,
}

impl From<&IssuedToken> for LoginResponse {
    fn from(issued: &IssuedToken) -> Self {
        Self {
            token: issued.token.clone(),
            expires: rfc3339(issued.session.expires_at),
            user: issued.session.claims.clone(),
        }
    }
}

pub(crate) fn rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}
