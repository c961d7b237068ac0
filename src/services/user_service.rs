use serde_json::Value;

use super::page_query;
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::listing::decode::decode_collection;
use crate::models::{EntityId, NewUser, User, UserUpdate};

const USERS_PATH: &str = "/users";
const USERS_FIELD: &str = "users";

#[derive(Clone)]
pub struct UserService {
    client: ApiClient,
}

impl UserService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Raw listing body; the backend may answer with a bare array or `{users: [...]}`
    pub async fn list_value(&self, skip: u32, limit: u32) -> Result<Value, ApiError> {
        self.client.get_value(USERS_PATH, &page_query(skip, limit)).await
    }

    pub async fn list(&self, skip: u32, limit: u32) -> Result<Vec<User>, ApiError> {
        let value = self.list_value(skip, limit).await?;
        decode_collection(value, USERS_FIELD)
    }

    pub async fn get(&self, id: EntityId) -> Result<User, ApiError> {
        self.client.get_json(&format!("{}/{}", USERS_PATH, id), &[]).await
    }

    pub async fn create(&self, user: &NewUser) -> Result<User, ApiError> {
        user.validate()?;
        self.client.post_json(USERS_PATH, user).await
    }

    pub async fn update(&self, id: EntityId, update: &UserUpdate) -> Result<User, ApiError> {
        self.client.patch_json(&format!("{}/{}", USERS_PATH, id), update).await
    }

    pub async fn delete(&self, id: EntityId) -> Result<(), ApiError> {
        self.client.delete(&format!("{}/{}", USERS_PATH, id)).await
    }
}
