//! The authorization gate.
//!
//! Every role-based decision in the backend goes through [`permits`]. Handlers
//! call [`authorize`] before touching the store, so a denied request has no
//! side effect.

use super::errors::AuthError;
use super::models::{Session, SessionClaims};

/// What an action requires of the caller's session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Any valid session.
    Authenticated,
    /// A session whose claims carry `isAdmin`.
    Admin,
}

/// Returns whether `claims` satisfy `required`. No session never does.
pub fn permits(claims: Option<&SessionClaims>, required: Capability) -> bool {
    match (claims, required) {
        (None, _) => false,
        (Some(_), Capability::Authenticated) => true,
        (Some(claims), Capability::Admin) => claims.is_admin,
    }
}

/// Like [`permits`], but says why access was denied.
///
/// A missing session is `InvalidSession` (the caller should log in), and a
/// session without the capability is `Forbidden`.
pub fn authorize(session: Option<&Session>, required: Capability) -> Result<&Session, AuthError> {
    let session = session.ok_or_else(|| AuthError::invalid_session("no session"))?;
    if permits(Some(&session.claims), required) {
        Ok(session)
    } else {
        Err(AuthError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn claims(is_admin: bool) -> SessionClaims {
        SessionClaims {
            id: "u1".into(),
            email: "a@x.com".into(),
            is_admin,
        }
    }

    fn session(is_admin: bool) -> Session {
        let now = Utc::now();
        Session {
            claims: claims(is_admin),
            issued_at: now,
            expires_at: now,
        }
    }

    #[test]
    fn admin_capability() {
        assert!(!permits(Some(&claims(false)), Capability::Admin));
        assert!(permits(Some(&claims(true)), Capability::Admin));
        assert!(!permits(None, Capability::Admin));
    }

    #[test]
    fn authenticated_capability() {
        assert!(permits(Some(&claims(false)), Capability::Authenticated));
        assert!(!permits(None, Capability::Authenticated));
    }

    #[test]
    fn authorize_distinguishes_missing_from_insufficient() {
        assert!(matches!(authorize(None, Capability::Admin), Err(AuthError::InvalidSession(_))));
        assert!(matches!(
            authorize(Some(&session(false)), Capability::Admin),
            Err(AuthError::Forbidden)
        ));

        let admin = session(true);
        assert_eq!(authorize(Some(&admin), Capability::Admin).unwrap(), &admin);
    }
}
