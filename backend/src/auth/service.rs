//! Core business logic for the authentication system.
//!
//! This service runs the login pipeline: credential lookup, password
//! verification, then claims issuance. It also projects and renews session
//! tokens, and hashes passwords for new accounts. It orchestrates interactions
//! between handlers and the database.

use tracing::{debug, info};

use super::claims::{claims_for, SessionIssuer};
use super::errors::AuthError;
use super::models::{IssuedToken, Session};
use super::password::PasswordVerifier;
use crate::config::Config;
use crate::database::Database;

pub struct AuthService {
    db: Database,
    verifier: PasswordVerifier,
    issuer: SessionIssuer,
}

impl AuthService {
    pub fn new(db: Database, config: &Config) -> Result<Self, AuthError> {
        Ok(Self {
            db,
            verifier: PasswordVerifier::new(config.bcrypt_cost)?,
            issuer: SessionIssuer::new(config.session_secret.as_bytes(), config.session_ttl)?,
        })
    }

    /// Verifies `email`/`password` and issues a session token.
    ///
    /// An unknown email is `NotFound` and a wrong password is
    /// `InvalidCredential`, but both paths pay for one bcrypt verification.
    /// Store failures pass through and are never turned into a denial.
    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedToken, AuthError> {
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredential);
        }

        let Some(user) = self.db.find_user_by_email(email).await? else {
            self.verifier.verify_decoy(password).await?;
            debug!("login denied: unknown email");
            return Err(AuthError::NotFound);
        };

        if !self.verifier.verify(password, &user.password_hash).await? {
            debug!(user_id = %user.id, "login denied: password mismatch");
            return Err(AuthError::InvalidCredential);
        }

        let issued = self.issuer.issue(claims_for(&user))?;
        info!(user_id = %user.id, is_admin = user.roles.is_admin, "login succeeded");
        Ok(issued)
    }

    pub fn project(&self, token: &str) -> Result<Session, AuthError> {
        self.issuer.project(token)
    }

    pub fn renew(&self, session: &Session) -> Result<IssuedToken, AuthError> {
        let renewed = self.issuer.renew(session)?;
        debug!(user_id = %session.claims.id, "session renewed");
        Ok(renewed)
    }

    pub async fn hash_password(&self, plaintext: &str) -> Result<String, AuthError> {
        self.verifier.hash(plaintext).await
    }

    pub fn issuer(&self) -> &SessionIssuer {
        &self.issuer
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use farmhub_adapters::{MemoryStore, NewUser, RoleFlags, StoreError, UserStore};

    use super::*;

    fn config() -> Config {
        Config::from_lookup(|key| match key {
            "MONGODB_URI" => Some("mongodb://localhost".into()),
            "SESSION_SECRET" => Some("unit-test-secret-unit-test-secret-0001".into()),
            "BCRYPT_COST" => Some("4".into()),
            _ => None,
        })
        .unwrap()
    }

    async fn service_with(
        email: &str,
        password: &str,
        roles: RoleFlags,
    ) -> (AuthService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        store
            .insert_user(NewUser {
                name: Some("Ada".into()),
                email: email.into(),
                password_hash: bcrypt::hash(password, 4).unwrap(),
                roles,
                farm: None,
            })
            .await
            .unwrap();
        let db = Database::new(store.clone(), Duration::from_secs(1));
        (AuthService::new(db, &config()).unwrap(), store)
    }

    #[tokio::test]
    async fn valid_credentials_issue_a_projectable_token() {
        let (auth, _) = service_with("a@x.com", "secret", RoleFlags::admin()).await;
        let issued = auth.login("a@x.com", "secret").await.unwrap();

        let session = auth.project(&issued.token).unwrap();
        assert_eq!(session.claims.email, "a@x.com");
        assert!(session.claims.is_admin);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_are_both_denials() {
        let (auth, _) = service_with("a@x.com", "secret", RoleFlags::default()).await;

        let wrong = auth.login("a@x.com", "wrong").await.unwrap_err();
        assert!(matches!(wrong, AuthError::InvalidCredential));

        let unknown = auth.login("nobody@x.com", "secret").await.unwrap_err();
        assert!(matches!(unknown, AuthError::NotFound));
    }

    #[tokio::test]
    async fn email_match_is_case_sensitive() {
        let (auth, _) = service_with("a@x.com", "secret", RoleFlags::default()).await;
        assert!(matches!(auth.login("A@X.COM", "secret").await, Err(AuthError::NotFound)));
    }

    #[tokio::test]
    async fn empty_fields_are_rejected_without_a_lookup() {
        let (auth, store) = service_with("a@x.com", "secret", RoleFlags::default()).await;
        store.set_unavailable(true);
        assert!(matches!(auth.login("a@x.com", "").await, Err(AuthError::InvalidCredential)));
        assert!(matches!(auth.login("", "secret").await, Err(AuthError::InvalidCredential)));
    }

    #[tokio::test]
    async fn store_outage_is_surfaced_not_swallowed() {
        let (auth, store) = service_with("a@x.com", "secret", RoleFlags::default()).await;
        store.set_unavailable(true);

        let err = auth.login("a@x.com", "secret").await.unwrap_err();
        assert!(matches!(err, AuthError::Store(StoreError::Unavailable(_))));
    }
}
