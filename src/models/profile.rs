use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{EntityId, Record};
use crate::error::ApiError;

/// Personal data attached to a user account; `user_id` is absent while
/// the profile is unassigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: EntityId,
    #[serde(default)]
    pub user_id: Option<EntityId>,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_name: Option<String>,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Profile {
    pub fn full_name(&self) -> String {
        [
            Some(self.first_name.as_str()),
            self.second_name.as_deref(),
            Some(self.last_name.as_str()),
            self.second_last_name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

impl Record for Profile {
    fn id(&self) -> EntityId {
        self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProfile {
    #[serde(default)]
    pub user_id: Option<EntityId>,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_name: Option<String>,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl NewProfile {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut field_errors = HashMap::new();
        if self.first_name.trim().is_empty() {
            field_errors.insert("first_name".to_string(), "El nombre es obligatorio".to_string());
        }
        if self.last_name.trim().is_empty() {
            field_errors.insert("last_name".to_string(), "El apellido es obligatorio".to_string());
        }

        if field_errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation {
                message: "Revisa los campos obligatorios".to_string(),
                field_errors,
            })
        }
    }
}

/// PATCH body; unset fields are left untouched by the backend
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}
