//! Request and response shapes for account management.

use farmhub_adapters::{FarmId, RoleFlags, UserRecord};
use serde::{Deserialize, Serialize};

/// Farm values the account form submits when no real farm was selectable.
const PLACEHOLDER_FARMS: [&str; 2] = ["no-farm", "default-farm"];

/// The kinds of account an administrator can create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    Admin,
    Manager,
    Director,
    Seller,
    Feed,
}

impl AccountKind {
    /// Parses the path segment after `/api/create/`.
    pub fn from_account_type(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Self::Admin),
            "manager" => Some(Self::Manager),
            "director" => Some(Self::Director),
            _ => None,
        }
    }

    /// Parses the path segment after `/api/create/user/`.
    pub fn from_user_role(value: &str) -> Option<Self> {
        match value {
            "seller" => Some(Self::Seller),
            "feed" => Some(Self::Feed),
            _ => None,
        }
    }

    pub fn roles(self) -> RoleFlags {
        let mut roles = RoleFlags::default();
        match self {
            Self::Admin => roles.is_admin = true,
            Self::Manager => roles.is_manager = true,
            Self::Director => roles.is_director = true,
            Self::Seller => roles.is_seller = true,
            Self::Feed => {}
        }
        roles
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub farm_id: Option<String>,
}

impl CreateAccountRequest {
    /// Checks required fields; returns the first problem found.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() || self.email.trim().is_empty() || self.password.is_empty() {
            return Err("All fields are required");
        }
        match self.email.trim().split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
            _ => Err("email address is not valid"),
        }
    }

    /// The farm reference to store, if the submitted value names a real farm.
    pub fn farm(&self) -> Option<FarmId> {
        self.farm_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty() && !PLACEHOLDER_FARMS.contains(id))
            .map(|id| FarmId(id.to_string()))
    }
}

/// A created account as returned to the caller. Never includes the hash.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub id: String,
    pub name: Option<String>,
    pub email: String,
    #[serde(flatten)]
    pub roles: RoleFlags,
    pub farm: Option<String>,
}

impl From<&UserRecord> for AccountView {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            roles: user.roles,
            farm: user.farm.as_ref().map(|f| f.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(
        name: &str,
        email: &str,
        password: &str,
        farm: Option<&str>,
    ) -> CreateAccountRequest {
        CreateAccountRequest {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            farm_id: farm.map(str::to_string),
        }
    }

    #[test]
    fn path_segments_map_to_role_flags() {
        let account = |t: &str| AccountKind::from_account_type(t).unwrap().roles();
        let user = |r: &str| AccountKind::from_user_role(r).unwrap().roles();

        assert_eq!(account("admin"), RoleFlags::admin());
        assert!(account("manager").is_manager);
        assert!(account("director").is_director);
        assert!(user("seller").is_seller);
        assert_eq!(user("feed"), RoleFlags::default());
        assert_eq!(AccountKind::from_account_type("user"), None);
        assert_eq!(AccountKind::from_user_role("admin"), None);
    }

    #[test]
    fn all_fields_are_required() {
        assert!(request("Ada", "ada@x.com", "pw", None).validate().is_ok());
        assert!(request(" ", "ada@x.com", "pw", None).validate().is_err());
        assert!(request("Ada", "", "pw", None).validate().is_err());
        assert!(request("Ada", "ada@x.com", "", None).validate().is_err());
        assert!(request("Ada", "ada.x.com", "pw", None).validate().is_err());
        assert!(request("Ada", "@x.com", "pw", None).validate().is_err());
    }

    #[test]
    fn placeholder_farms_are_not_stored() {
        assert_eq!(request("A", "a@x", "p", Some("no-farm")).farm(), None);
        assert_eq!(request("A", "a@x", "p", Some("default-farm")).farm(), None);
        assert_eq!(request("A", "a@x", "p", Some("")).farm(), None);
        assert_eq!(request("A", "a@x", "p", None).farm(), None);
        assert_eq!(request("A", "a@x", "p", Some("f1")).farm(), Some(FarmId("f1".into())));
    }

    #[test]
    fn account_view_has_flags_but_no_hash() {
        let user = UserRecord {
            id: farmhub_adapters::UserId("u1".into()),
            name: Some("Ada".into()),
            email: "ada@x.com".into(),
            password_hash: "$2b$04$hash".into(),
            roles: RoleFlags::admin(),
            farm: None,
        };
        let json = serde_json::to_value(AccountView::from(&user)).unwrap();
        assert_eq!(json["isAdmin"], true);
        assert_eq!(json["isSeller"], false);
        assert!(!json.to_string().contains("$2b$"));
    }
}
