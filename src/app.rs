//! Application wiring.
//!
//! Builds every component explicitly from a config, a storage backend and a
//! navigator, and tears them down again on shutdown.

use std::sync::Arc;

use crate::client::ApiClient;
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::events::AuthEvents;
use crate::listing::{ListScreen, ProfilesResource, RelationshipsResource, UsersResource};
use crate::services::{AuthService, ProfileService, RelationshipService, UserService};
use crate::session::{Navigator, RecoveryPolicy, SessionContext, SessionGuard};
use crate::storage::KeyValueStore;

/// How an expired session is recovered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginAffordance {
    /// Re-open the login modal
    Modal,
    /// Navigate to the login route
    Redirect,
}

pub struct App {
    pub config: AppConfig,
    pub events: AuthEvents,
    pub client: ApiClient,
    pub users: UserService,
    pub profiles: ProfileService,
    pub relationships: RelationshipService,
    pub session: SessionContext,
    pub guard: SessionGuard,
}

impl App {
    pub async fn bootstrap(
        config: AppConfig,
        store: Arc<dyn KeyValueStore>,
        navigator: Arc<dyn Navigator>,
        affordance: LoginAffordance,
    ) -> Result<Self, ApiError> {
        let events = AuthEvents::new();
        let client = ApiClient::new(&config.api, Arc::clone(&store), events.clone())?;

        let users = UserService::new(client.clone());
        let profiles = ProfileService::new(client.clone());
        let relationships = RelationshipService::new(client.clone(), config.relationships.types.clone());
        let auth = AuthService::new(client.clone(), config.api.token_path.clone());

        let session = SessionContext::new(auth, store, events.clone());
        session.initialize().await;
        session.start_logout_listener();

        let modal = match affordance {
            LoginAffordance::Modal => Some(session.clone()),
            LoginAffordance::Redirect => None,
        };
        let guard = SessionGuard::new(modal, navigator, RecoveryPolicy::from(&config.session));

        tracing::info!(base_url = %client.base_url(), env = ?config.environment, "Admin client ready");

        Ok(Self {
            config,
            events,
            client,
            users,
            profiles,
            relationships,
            session,
            guard,
        })
    }

    pub fn profiles_screen(&self) -> ListScreen<ProfilesResource> {
        ListScreen::new(
            ProfilesResource::new(self.profiles.clone()),
            self.session.clone(),
            self.guard.clone(),
            self.users.clone(),
            &self.config.listing,
        )
    }

    pub fn relationships_screen(&self) -> ListScreen<RelationshipsResource> {
        ListScreen::new(
            RelationshipsResource::new(self.relationships.clone()),
            self.session.clone(),
            self.guard.clone(),
            self.users.clone(),
            &self.config.listing,
        )
    }

    pub fn users_screen(&self) -> ListScreen<UsersResource> {
        ListScreen::new(
            UsersResource::new(self.users.clone()),
            self.session.clone(),
            self.guard.clone(),
            self.users.clone(),
            &self.config.listing,
        )
    }

    /// Let pending recoveries run, then stop background tasks
    pub async fn shutdown(&self) {
        self.guard.settle().await;
        self.session.shutdown();
        tracing::debug!("Admin client shut down");
    }

    /// Stop background tasks without waiting; pending recoveries are dropped
    pub fn shutdown_now(&self) {
        self.guard.abort_pending();
        self.session.shutdown();
        tracing::debug!("Admin client shut down, pending recoveries aborted");
    }
}
