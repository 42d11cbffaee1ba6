//! Session claims: issuing signed tokens and projecting them back.
//!
//! Tokens are HS256 JWTs. The payload is `{id, email, isAdmin, iat, exp}`.
//! Their lifetime is set by the server at issue time. Projection accepts no
//! clock leeway: a token is dead from the second its `exp` is reached.

use std::time::Duration;

use chrono::{DateTime, Utc};
use farmhub_adapters::UserRecord;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::errors::AuthError;
use super::models::{rfc3339, IssuedToken, Session, SessionClaims, SessionView, TokenClaims};

/// Maps a verified user into the claims a session carries.
pub fn claims_for(user: &UserRecord) -> SessionClaims {
    SessionClaims {
        id: user.id.to_string(),
        email: user.email.clone(),
        is_admin: user.roles.is_admin,
    }
}

/// Projects a decoded session into the client-facing view.
pub fn session_view(session: &Session) -> SessionView {
    SessionView {
        user: session.claims.clone(),
        expires: rfc3339(session.expires_at),
    }
}

pub struct SessionIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: chrono::Duration,
}

impl SessionIssuer {
    pub fn new(secret: &[u8], ttl: Duration) -> Result<Self, AuthError> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| AuthError::Internal(format!("session ttl out of range: {e}")))?;
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        })
    }

    pub fn ttl(&self) -> chrono::Duration {
        self.ttl
    }

    pub fn issue(&self, claims: SessionClaims) -> Result<IssuedToken, AuthError> {
        self.issue_at(claims, Utc::now())
    }

    /// Signs `claims` as if issued at `now`; the token expires at `now + ttl`.
    pub fn issue_at(
        &self,
        claims: SessionClaims,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, AuthError> {
        let issued_at = truncate_to_second(now)?;
        let expires_at = issued_at
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::Internal("session expiry out of range".into()))?;
        let payload = TokenClaims {
            claims,
            iat: unix_seconds(issued_at)?,
            exp: unix_seconds(expires_at)?,
        };
        let token = encode(&Header::new(Algorithm::HS256), &payload, &self.encoding)
            .map_err(|e| AuthError::Internal(format!("token signing failed: {e}")))?;
        Ok(IssuedToken {
            token,
            session: Session {
                claims: payload.claims,
                issued_at,
                expires_at,
            },
        })
    }

    /// Verifies signature and expiry and returns the session the token encodes.
    ///
    /// Every failure, including a malformed token, is `InvalidSession`.
    pub fn project(&self, token: &str) -> Result<Session, AuthError> {
        self.project_at(token, Utc::now())
    }

    fn project_at(&self, token: &str, now: DateTime<Utc>) -> Result<Session, AuthError> {
        let data = decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| AuthError::invalid_session(format!("{:?}", e.kind())))?;
        let TokenClaims { claims, iat, exp } = data.claims;
        // jsonwebtoken still accepts `exp == now`.
        if i64::try_from(exp).is_ok_and(|exp| exp <= now.timestamp()) {
            return Err(AuthError::invalid_session("ExpiredSignature"));
        }
        Ok(Session {
            claims,
            issued_at: from_unix_seconds(iat)?,
            expires_at: from_unix_seconds(exp)?,
        })
    }

    /// Re-issues a token for an existing session with a fresh expiry.
    pub fn renew(&self, session: &Session) -> Result<IssuedToken, AuthError> {
        self.issue(session.claims.clone())
    }
}

fn truncate_to_second(at: DateTime<Utc>) -> Result<DateTime<Utc>, AuthError> {
    DateTime::from_timestamp(at.timestamp(), 0)
        .ok_or_else(|| AuthError::Internal("timestamp out of range".into()))
}

fn unix_seconds(at: DateTime<Utc>) -> Result<u64, AuthError> {
    u64::try_from(at.timestamp()).map_err(|_| AuthError::Internal("timestamp before epoch".into()))
}

fn from_unix_seconds(secs: u64) -> Result<DateTime<Utc>, AuthError> {
    i64::try_from(secs)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or_else(|| AuthError::invalid_session("timestamp out of range"))
}
