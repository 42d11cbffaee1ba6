//! MongoDB implementation of `UserStore`.
//!
//! Users live in the `users` collection and farms in `farms`. Documents use
//! the camelCase field names the web front end writes (`isAdmin`, ...). Any
//! role flag that is missing or `null` reads as `false`.
//!
//! The driver's `Client` owns a connection pool and is cheap to clone, so one
//! `MongoStore` is built at startup and shared by every request.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::StoreError;
use crate::models::{FarmId, FarmRecord, NewUser, RoleFlags, UserId, UserRecord};
use crate::UserStore;

const USERS: &str = "users";
const FARMS: &str = "farms";
const DUPLICATE_KEY: i32 = 11000;
const FALLBACK_DATABASE: &str = "test";

#[derive(Debug, Serialize, Deserialize)]
struct UserDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    email: String,
    password: String,
    #[serde(rename = "isAdmin", default)]
    is_admin: Option<bool>,
    #[serde(rename = "isManager", default)]
    is_manager: Option<bool>,
    #[serde(rename = "isDirector", default)]
    is_director: Option<bool>,
    #[serde(rename = "isSeller", default)]
    is_seller: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    farm: Option<String>,
}

impl UserDocument {
    fn from_new(user: &NewUser) -> Self {
        Self {
            id: None,
            name: user.name.clone(),
            email: user.email.clone(),
            password: user.password_hash.clone(),
            is_admin: Some(user.roles.is_admin),
            is_manager: Some(user.roles.is_manager),
            is_director: Some(user.roles.is_director),
            is_seller: Some(user.roles.is_seller),
            farm: user.farm.as_ref().map(|f| f.0.clone()),
        }
    }

    fn into_record(self) -> Result<UserRecord, StoreError> {
        let id = self
            .id
            .ok_or_else(|| StoreError::Malformed(format!("user {} has no _id", self.email)))?;
        Ok(UserRecord {
            id: UserId(id.to_hex()),
            name: self.name,
            email: self.email,
            password_hash: self.password,
            roles: RoleFlags {
                is_admin: self.is_admin.unwrap_or(false),
                is_manager: self.is_manager.unwrap_or(false),
                is_director: self.is_director.unwrap_or(false),
                is_seller: self.is_seller.unwrap_or(false),
            },
            farm: self.farm.map(FarmId),
        })
    }
}

#[derive(Debug, Deserialize)]
struct FarmDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
}

#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    /// Parses `uri` and builds a pooled client.
    ///
    /// `database` overrides the database named in the URI; with neither, the
    /// driver's conventional `test` database is used. `timeout` bounds both
    /// connection setup and server selection. The driver connects lazily, so
    /// an unreachable server surfaces on the first operation, not here.
    pub async fn connect(
        uri: &str,
        database: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(uri).await.map_err(map_driver_error)?;
        options.app_name = Some("farmhub".to_string());
        options.connect_timeout = Some(timeout);
        options.server_selection_timeout = Some(timeout);

        let client = Client::with_options(options).map_err(map_driver_error)?;
        let db = match database {
            Some(name) => client.database(name),
            None => client
                .default_database()
                .unwrap_or_else(|| client.database(FALLBACK_DATABASE)),
        };
        info!(database = db.name(), "mongodb client ready");
        Ok(Self { db })
    }

    fn users(&self) -> Collection<UserDocument> {
        self.db.collection(USERS)
    }

    fn farms(&self) -> Collection<FarmDocument> {
        self.db.collection(FARMS)
    }
}

#[async_trait]
impl UserStore for MongoStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let found = self
            .users()
            .find_one(doc! { "email": email })
            .await
            .map_err(map_driver_error)?;
        debug!(found = found.is_some(), "users.findOne by email");
        found.map(UserDocument::into_record).transpose()
    }

    async fn insert_user(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        let document = UserDocument::from_new(&user);
        let result = self.users().insert_one(&document).await.map_err(|err| {
            if is_duplicate_key(&err) {
                StoreError::Duplicate(user.email.clone())
            } else {
                map_driver_error(err)
            }
        })?;
        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| StoreError::Malformed("inserted _id is not an ObjectId".into()))?;
        Ok(user.into_record(UserId(id.to_hex())))
    }

    async fn list_farms(&self) -> Result<Vec<FarmRecord>, StoreError> {
        let cursor = self
            .farms()
            .find(doc! {})
            .sort(doc! { "name": 1 })
            .await
            .map_err(map_driver_error)?;
        let farms: Vec<FarmDocument> = cursor.try_collect().await.map_err(map_driver_error)?;
        Ok(farms
            .into_iter()
            .map(|f| FarmRecord {
                id: FarmId(f.id.to_hex()),
                name: f.name,
            })
            .collect())
    }

    async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.users()
            .create_index(index)
            .await
            .map_err(map_driver_error)?;
        Ok(())
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY
    )
}

fn map_driver_error(err: mongodb::error::Error) -> StoreError {
    match err.kind.as_ref() {
        ErrorKind::BsonDeserialization(_) => StoreError::Malformed(err.to_string()),
        _ => StoreError::Unavailable(err.to_string()),
    }
}
