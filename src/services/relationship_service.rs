use serde_json::Value;

use super::page_query;
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::listing::decode::decode_collection;
use crate::models::{EntityId, NewRelationship, Relationship, RelationshipUpdate};

const RELATIONSHIPS_PATH: &str = "/user-relationships";
pub const RELATIONSHIPS_FIELD: &str = "relationships";

#[derive(Clone)]
pub struct RelationshipService {
    client: ApiClient,
    allowed_types: Vec<String>,
}

impl RelationshipService {
    pub fn new(client: ApiClient, allowed_types: Vec<String>) -> Self {
        Self { client, allowed_types }
    }

    pub fn allowed_types(&self) -> &[String] {
        &self.allowed_types
    }

    pub async fn list_value(&self, skip: u32, limit: u32) -> Result<Value, ApiError> {
        self.client.get_value(RELATIONSHIPS_PATH, &page_query(skip, limit)).await
    }

    pub async fn list(&self, skip: u32, limit: u32) -> Result<Vec<Relationship>, ApiError> {
        decode_collection(self.list_value(skip, limit).await?, RELATIONSHIPS_FIELD)
    }

    pub async fn get(&self, id: EntityId) -> Result<Relationship, ApiError> {
        self.client.get_json(&format!("{}/{}", RELATIONSHIPS_PATH, id), &[]).await
    }

    /// Rejected locally when both sides are the same user
    pub async fn create(&self, relationship: &NewRelationship) -> Result<Relationship, ApiError> {
        relationship.validate(&self.allowed_types)?;
        self.client.post_json(RELATIONSHIPS_PATH, relationship).await
    }

    pub async fn update(&self, id: EntityId, update: &RelationshipUpdate) -> Result<Relationship, ApiError> {
        update.validate(&self.allowed_types)?;
        self.client.patch_json(&format!("{}/{}", RELATIONSHIPS_PATH, id), update).await
    }

    pub async fn delete(&self, id: EntityId) -> Result<(), ApiError> {
        self.client.delete(&format!("{}/{}", RELATIONSHIPS_PATH, id)).await
    }
}
