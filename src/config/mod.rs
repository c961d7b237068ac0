use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub listing: ListingConfig,
    pub session: SessionConfig,
    pub relationships: RelationshipConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
    /// Path of the token-issuing endpoint; a 401 here means bad credentials
    pub token_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    pub page_size: u32,
    pub bulk_user_limit: u32,
    pub lookup_concurrency: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub relogin_modal_delay_ms: u64,
    pub relogin_redirect_delay_ms: u64,
    pub login_route: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipConfig {
    /// Allowed `relationship_type` values; empty accepts anything
    pub types: Vec<String>,
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl SessionConfig {
    pub fn modal_delay(&self) -> Duration {
        Duration::from_millis(self.relogin_modal_delay_ms)
    }

    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.relogin_redirect_delay_ms)
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    /// Development defaults pointed at an arbitrary backend, used by tests
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        let mut config = Self::development();
        config.api.base_url = base_url.into();
        config
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("BAMBINO_API_URL") {
            if !v.trim().is_empty() {
                self.api.base_url = v.trim().to_string();
            }
        }
        if let Ok(v) = env::var("BAMBINO_REQUEST_TIMEOUT_SECS") {
            self.api.request_timeout_secs = v.parse().unwrap_or(self.api.request_timeout_secs);
        }

        if let Ok(v) = env::var("BAMBINO_PAGE_SIZE") {
            self.listing.page_size = v.parse().unwrap_or(self.listing.page_size);
        }
        if let Ok(v) = env::var("BAMBINO_BULK_USER_LIMIT") {
            self.listing.bulk_user_limit = v.parse().unwrap_or(self.listing.bulk_user_limit);
        }
        if let Ok(v) = env::var("BAMBINO_LOOKUP_CONCURRENCY") {
            self.listing.lookup_concurrency = v
                .parse()
                .ok()
                .filter(|n: &usize| *n > 0)
                .unwrap_or(self.listing.lookup_concurrency);
        }

        if let Ok(v) = env::var("BAMBINO_RELATIONSHIP_TYPES") {
            self.relationships.types = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                base_url: "http://localhost:8000".to_string(),
                request_timeout_secs: 30,
                token_path: "/token".to_string(),
            },
            listing: ListingConfig {
                page_size: 10,
                bulk_user_limit: 1000,
                lookup_concurrency: 4,
            },
            session: SessionConfig {
                relogin_modal_delay_ms: 1500,
                relogin_redirect_delay_ms: 3000,
                login_route: "/login".to_string(),
            },
            relationships: RelationshipConfig {
                types: default_relationship_types(),
            },
        }
    }

    fn staging() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Staging;
        config.api.base_url = "https://staging-api.casadelbambino.edu".to_string();
        config.api.request_timeout_secs = 15;
        config
    }

    fn production() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Production;
        config.api.base_url = "https://api.casadelbambino.edu".to_string();
        config.api.request_timeout_secs = 10;
        config.listing.page_size = 20;
        config
    }
}

fn default_relationship_types() -> Vec<String> {
    ["padre", "madre", "tutor", "hermano", "abuelo", "otro"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

// Global config for the binary; library code takes an explicit &AppConfig
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.listing.bulk_user_limit, 1000);
        assert!(config.session.redirect_delay() > config.session.modal_delay());
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert_eq!(config.environment, Environment::Production);
        assert!(config.api.base_url.starts_with("https://"));
        assert_eq!(config.api.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_for_base_url_keeps_development_defaults() {
        let config = AppConfig::for_base_url("http://127.0.0.1:9000");
        assert_eq!(config.api.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.api.token_path, "/token");
        assert!(config.relationships.types.contains(&"tutor".to_string()));
    }
}
