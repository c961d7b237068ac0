use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{NewUser, User};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Token issuance and self-registration
#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
    token_path: String,
}

impl AuthService {
    pub fn new(client: ApiClient, token_path: impl Into<String>) -> Self {
        Self {
            client,
            token_path: token_path.into(),
        }
    }

    /// Form-encoded `username`/`password`; 401 comes back as `InvalidCredentials`
    pub async fn issue_token(&self, email: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let token: TokenResponse = self
            .client
            .post_form(&self.token_path, &[("username", email), ("password", password)])
            .await?;

        if token.access_token.is_empty() {
            return Err(ApiError::unexpected_shape("token response without access_token"));
        }
        Ok(token)
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let user = NewUser {
            email: email.to_string(),
            password: password.to_string(),
            role: None,
        };
        user.validate()?;
        self.client.post_json("/users", &user).await
    }
}
