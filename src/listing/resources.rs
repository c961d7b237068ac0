//! What each list screen fetches and how its rows are built.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::enrich::Resolution;
use super::messages::{self, ScreenMessages};
use crate::error::ApiError;
use crate::models::{EntityId, Profile, Record, Relationship, User};
use crate::services::profile_service::PROFILES_FIELD;
use crate::services::relationship_service::RELATIONSHIPS_FIELD;
use crate::services::{ProfileService, RelationshipService, UserService};

/// A paginated primary collection shown on a list screen
#[async_trait]
pub trait ListResource: Send + Sync {
    type Item: Record + DeserializeOwned + Serialize + Clone + Send + Sync;
    type Row: Record + Serialize + Clone + Send + Sync;

    /// Field that may wrap the array in a list response
    fn collection_field(&self) -> &'static str;

    fn messages(&self) -> &ScreenMessages;

    /// Whether rows reference users that need resolving
    fn needs_user_directory(&self) -> bool {
        true
    }

    /// User ids the row displays, one entry per display column
    fn user_refs(&self, item: &Self::Item) -> Vec<Option<EntityId>>;

    /// `resolved` is parallel to [`ListResource::user_refs`]
    fn to_row(&self, item: &Self::Item, resolved: &[Resolution]) -> Self::Row;

    async fn fetch_page(&self, skip: u32, limit: u32) -> Result<Value, ApiError>;

    async fn delete(&self, id: EntityId) -> Result<(), ApiError>;
}

fn column(resolved: &[Resolution], index: usize) -> String {
    resolved
        .get(index)
        .cloned()
        .unwrap_or(Resolution::Failed)
        .into_display()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileRow {
    #[serde(flatten)]
    pub profile: Profile,
    pub user_email: String,
}

impl Record for ProfileRow {
    fn id(&self) -> EntityId {
        self.profile.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationshipRow {
    #[serde(flatten)]
    pub relationship: Relationship,
    pub user_name: String,
    pub related_user_name: String,
}

impl Record for RelationshipRow {
    fn id(&self) -> EntityId {
        self.relationship.id
    }
}

pub struct ProfilesResource {
    service: ProfileService,
}

impl ProfilesResource {
    pub fn new(service: ProfileService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ListResource for ProfilesResource {
    type Item = Profile;
    type Row = ProfileRow;

    fn collection_field(&self) -> &'static str {
        PROFILES_FIELD
    }

    fn messages(&self) -> &ScreenMessages {
        &messages::PROFILES
    }

    fn user_refs(&self, item: &Profile) -> Vec<Option<EntityId>> {
        vec![item.user_id]
    }

    fn to_row(&self, item: &Profile, resolved: &[Resolution]) -> ProfileRow {
        ProfileRow {
            profile: item.clone(),
            user_email: column(resolved, 0),
        }
    }

    async fn fetch_page(&self, skip: u32, limit: u32) -> Result<Value, ApiError> {
        self.service.list_value(skip, limit).await
    }

    async fn delete(&self, id: EntityId) -> Result<(), ApiError> {
        self.service.delete(id).await
    }
}

pub struct RelationshipsResource {
    service: RelationshipService,
}

impl RelationshipsResource {
    pub fn new(service: RelationshipService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ListResource for RelationshipsResource {
    type Item = Relationship;
    type Row = RelationshipRow;

    fn collection_field(&self) -> &'static str {
        RELATIONSHIPS_FIELD
    }

    fn messages(&self) -> &ScreenMessages {
        &messages::RELATIONSHIPS
    }

    fn user_refs(&self, item: &Relationship) -> Vec<Option<EntityId>> {
        vec![Some(item.user_id), Some(item.related_user_id)]
    }

    fn to_row(&self, item: &Relationship, resolved: &[Resolution]) -> RelationshipRow {
        RelationshipRow {
            relationship: item.clone(),
            user_name: column(resolved, 0),
            related_user_name: column(resolved, 1),
        }
    }

    async fn fetch_page(&self, skip: u32, limit: u32) -> Result<Value, ApiError> {
        self.service.list_value(skip, limit).await
    }

    async fn delete(&self, id: EntityId) -> Result<(), ApiError> {
        self.service.delete(id).await
    }
}

/// The users screen lists users directly; nothing to resolve
pub struct UsersResource {
    service: UserService,
}

impl UsersResource {
    pub fn new(service: UserService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ListResource for UsersResource {
    type Item = User;
    type Row = User;

    fn collection_field(&self) -> &'static str {
        "users"
    }

    fn messages(&self) -> &ScreenMessages {
        &messages::USERS
    }

    fn needs_user_directory(&self) -> bool {
        false
    }

    fn user_refs(&self, _item: &User) -> Vec<Option<EntityId>> {
        Vec::new()
    }

    fn to_row(&self, item: &User, _resolved: &[Resolution]) -> User {
        item.clone()
    }

    async fn fetch_page(&self, skip: u32, limit: u32) -> Result<Value, ApiError> {
        self.service.list_value(skip, limit).await
    }

    async fn delete(&self, id: EntityId) -> Result<(), ApiError> {
        self.service.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn profile_row_flattens_profile_fields() {
        let profile: Profile =
            serde_json::from_value(json!({"id": 10, "user_id": 1, "first_name": "Ana", "last_name": "Li"})).unwrap();
        let row = ProfileRow {
            profile,
            user_email: "a@x.com".into(),
        };
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["id"], 10);
        assert_eq!(value["first_name"], "Ana");
        assert_eq!(value["user_email"], "a@x.com");
    }

    #[test]
    fn missing_resolution_column_renders_as_failure() {
        assert_eq!(column(&[], 1), "Error al cargar");
    }
}
