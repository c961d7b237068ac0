use serde::{Deserialize, Serialize};

use super::{EntityId, Record};
use crate::error::ApiError;

pub const SELF_RELATIONSHIP_MESSAGE: &str = "No se puede crear una relación con el mismo usuario";

/// Directed link between two users (guardian → student, sibling, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: EntityId,
    pub user_id: EntityId,
    pub related_user_id: EntityId,
    pub relationship_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Record for Relationship {
    fn id(&self) -> EntityId {
        self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRelationship {
    pub user_id: EntityId,
    pub related_user_id: EntityId,
    pub relationship_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewRelationship {
    /// Client-side checks run before anything is sent.
    ///
    /// `allowed_types` comes from configuration; an empty list accepts any type.
    pub fn validate(&self, allowed_types: &[String]) -> Result<(), ApiError> {
        if self.user_id == self.related_user_id {
            return Err(ApiError::field("related_user_id", SELF_RELATIONSHIP_MESSAGE));
        }
        validate_type(&self.relationship_type, allowed_types)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelationshipUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_user_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RelationshipUpdate {
    pub fn validate(&self, allowed_types: &[String]) -> Result<(), ApiError> {
        if let (Some(a), Some(b)) = (self.user_id, self.related_user_id) {
            if a == b {
                return Err(ApiError::field("related_user_id", SELF_RELATIONSHIP_MESSAGE));
            }
        }
        match &self.relationship_type {
            Some(kind) => validate_type(kind, allowed_types),
            None => Ok(()),
        }
    }
}

fn validate_type(kind: &str, allowed_types: &[String]) -> Result<(), ApiError> {
    if kind.trim().is_empty() {
        return Err(ApiError::field("relationship_type", "El tipo de relación es obligatorio"));
    }
    if !allowed_types.is_empty() && !allowed_types.iter().any(|t| t == kind) {
        return Err(ApiError::field(
            "relationship_type",
            format!("Tipo de relación no válido: {}", kind),
        ));
    }
    Ok(())
}
