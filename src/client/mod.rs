//! Outbound HTTP to the management backend.
//!
//! Attaches the stored bearer token to every request and logs each call.
//! A 401 from anything but the token endpoint clears the stored session and
//! broadcasts `auth:logout` before the error reaches the caller.

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use url::Url;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::events::AuthEvents;
use crate::storage::{KeyValueStore, PersistedSession, TOKEN_KEY};

/// Query pairs appended to a request URL
pub type Query<'a> = [(&'a str, String)];

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token_path: String,
    store: Arc<dyn KeyValueStore>,
    events: AuthEvents,
}

impl ApiClient {
    pub fn new(
        config: &ApiConfig,
        store: Arc<dyn KeyValueStore>,
        events: AuthEvents,
    ) -> Result<Self, ApiError> {
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)
            .map_err(|e| ApiError::Network(format!("Invalid base URL '{}': {}", config.base_url, e)))?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            token_path: normalize_path(&config.token_path),
            store,
            events,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &Query<'_>) -> Result<T, ApiError> {
        let req = self.request(Method::GET, path)?.query(query);
        let response = self.execute(req, Method::GET, path).await?;
        Ok(response.json::<T>().await?)
    }

    /// GET without committing to a shape; used where the backend may wrap lists
    pub async fn get_value(&self, path: &str, query: &Query<'_>) -> Result<Value, ApiError> {
        self.get_json::<Value>(path, query).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.request(Method::POST, path)?.json(body);
        let response = self.execute(req, Method::POST, path).await?;
        Ok(response.json::<T>().await?)
    }

    pub async fn patch_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.request(Method::PATCH, path)?.json(body);
        let response = self.execute(req, Method::PATCH, path).await?;
        Ok(response.json::<T>().await?)
    }

    pub async fn post_form<T: DeserializeOwned>(&self, path: &str, form: &[(&str, &str)]) -> Result<T, ApiError> {
        let req = self.request(Method::POST, path)?.form(form);
        let response = self.execute(req, Method::POST, path).await?;
        Ok(response.json::<T>().await?)
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let req = self.request(Method::DELETE, path)?;
        self.execute(req, Method::DELETE, path).await?;
        Ok(())
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::Network(format!("Invalid request path '{}': {}", path, e)))?;
        Ok(self.http.request(method, url))
    }

    fn stored_token(&self) -> Option<String> {
        match self.store.get(TOKEN_KEY) {
            Ok(token) => token,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read stored token");
                None
            }
        }
    }

    async fn execute(&self, req: RequestBuilder, method: Method, path: &str) -> Result<Response, ApiError> {
        let req = match self.stored_token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        };

        tracing::debug!(http.method = %method, http.path = path, "Outgoing request");

        let response = req.send().await.map_err(|e| {
            tracing::warn!(http.method = %method, http.path = path, error = %e, "Request failed before a response");
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();
        tracing::debug!(http.method = %method, http.path = path, http.status_code = status.as_u16(), "Response received");

        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            if self.is_token_path(path) {
                return Err(ApiError::InvalidCredentials);
            }
            self.invalidate_session(path);
            return Err(ApiError::SessionExpired);
        }

        let body = response.json::<Value>().await.ok();
        let err = ApiError::from_status(status.as_u16(), body.as_ref());
        tracing::warn!(http.method = %method, http.path = path, http.status_code = status.as_u16(), error = %err, "Request rejected");
        Err(err)
    }

    fn is_token_path(&self, path: &str) -> bool {
        normalize_path(path) == self.token_path
    }

    fn invalidate_session(&self, path: &str) {
        tracing::warn!(http.path = path, "Received 401, clearing stored session");
        if let Err(e) = PersistedSession::clear(self.store.as_ref()) {
            tracing::error!(error = %e, "Failed to clear stored session");
        }
        self.events.logout();
    }
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.split('?').next().unwrap_or("").trim_matches('/');
    format!("/{}", trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::storage::MemoryStore;

    fn client(base: &str) -> ApiClient {
        let config = AppConfig::for_base_url(base);
        ApiClient::new(&config.api, Arc::new(MemoryStore::new()), AuthEvents::new()).unwrap()
    }

    #[test]
    fn base_url_keeps_its_path_prefix() {
        let c = client("http://localhost:8000/api/v1");
        let req = c.request(Method::GET, "/profiles").unwrap().build().unwrap();
        assert_eq!(req.url().as_str(), "http://localhost:8000/api/v1/profiles");
    }

    #[test]
    fn token_path_matching_ignores_slashes_and_query() {
        let c = client("http://localhost:8000");
        assert!(c.is_token_path("/token"));
        assert!(c.is_token_path("token/"));
        assert!(c.is_token_path("/token?x=1"));
        assert!(!c.is_token_path("/users"));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let config = AppConfig::for_base_url("not a url");
        let result = ApiClient::new(&config.api, Arc::new(MemoryStore::new()), AuthEvents::new());
        assert!(matches!(result, Err(ApiError::Network(_))));
    }
}
