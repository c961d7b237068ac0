use serde::{Deserialize, Serialize};

use super::{EntityId, Record};
use crate::error::ApiError;

const MIN_PASSWORD_LEN: usize = 6;

/// Account record owned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl Record for User {
    fn id(&self) -> EntityId {
        self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), ApiError> {
        if !self.email.contains('@') {
            return Err(ApiError::field("email", "Correo electrónico inválido"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ApiError::field(
                "password",
                format!("La contraseña debe tener al menos {} caracteres", MIN_PASSWORD_LEN),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}
