//! Generic data models for the `adapters` crate.
//!
//! These models are the store-independent representation of users and farms.
//! Each adapter maps its own document shape into them, so the backend never
//! sees driver types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, store-assigned user identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Weak reference to a farm. Holding one does not imply the farm exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FarmId(pub String);

impl fmt::Display for FarmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleFlags {
    pub is_admin: bool,
    pub is_manager: bool,
    pub is_director: bool,
    pub is_seller: bool,
}

impl RoleFlags {
    pub fn admin() -> Self {
        Self {
            is_admin: true,
            ..Self::default()
        }
    }
}

/// A stored user, including the password hash.
///
/// `Debug` redacts the hash so records can be logged safely.
#[derive(Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub name: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub roles: RoleFlags,
    pub farm: Option<FarmId>,
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("roles", &self.roles)
            .field("farm", &self.farm)
            .finish()
    }
}

/// Insert payload for a new account. The password is already hashed.
#[derive(Clone)]
pub struct NewUser {
    pub name: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub roles: RoleFlags,
    pub farm: Option<FarmId>,
}

impl NewUser {
    pub fn into_record(self, id: UserId) -> UserRecord {
        UserRecord {
            id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            roles: self.roles,
            farm: self.farm,
        }
    }
}

/// Selectable farm value. Serialized the way clients expect it: `{_id, name}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmRecord {
    #[serde(rename = "_id")]
    pub id: FarmId,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_never_contains_the_hash() {
        let record = UserRecord {
            id: UserId("u1".into()),
            name: None,
            email: "a@x.com".into(),
            password_hash: "$2b$10$abcdefghijklmnopqrstuv".into(),
            roles: RoleFlags::default(),
            farm: None,
        };
        let printed = format!("{record:?}");
        assert!(!printed.contains("$2b$"));
        assert!(printed.contains("<redacted>"));
    }
}
