use serde_json::Value;

use super::page_query;
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::listing::decode::decode_collection;
use crate::models::{EntityId, NewProfile, Profile, ProfileUpdate};

const PROFILES_PATH: &str = "/profiles";
pub const PROFILES_FIELD: &str = "profiles";

#[derive(Clone)]
pub struct ProfileService {
    client: ApiClient,
}

impl ProfileService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_value(&self, skip: u32, limit: u32) -> Result<Value, ApiError> {
        self.client.get_value(PROFILES_PATH, &page_query(skip, limit)).await
    }

    pub async fn list(&self, skip: u32, limit: u32) -> Result<Vec<Profile>, ApiError> {
        decode_collection(self.list_value(skip, limit).await?, PROFILES_FIELD)
    }

    pub async fn get(&self, id: EntityId) -> Result<Profile, ApiError> {
        self.client.get_json(&format!("{}/{}", PROFILES_PATH, id), &[]).await
    }

    pub async fn create(&self, profile: &NewProfile) -> Result<Profile, ApiError> {
        profile.validate()?;
        self.client.post_json(PROFILES_PATH, profile).await
    }

    pub async fn update(&self, id: EntityId, update: &ProfileUpdate) -> Result<Profile, ApiError> {
        self.client.patch_json(&format!("{}/{}", PROFILES_PATH, id), update).await
    }

    pub async fn delete(&self, id: EntityId) -> Result<(), ApiError> {
        self.client.delete(&format!("{}/{}", PROFILES_PATH, id)).await
    }
}
