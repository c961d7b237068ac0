//! Authenticated-session state shared by every screen.
//!
//! A [`SessionContext`] is constructed once by the application, handed to
//! whatever needs it, and shut down with the application. It owns the
//! login/logout flow and the auth modal state.

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Weak};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::error::ApiError;
use crate::events::{AuthEvent, AuthEvents};
use crate::models::EntityId;
use crate::services::AuthService;
use crate::storage::{KeyValueStore, PersistedSession};

/// Which auth/user modal is showing. At most one at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "modal", content = "user_id", rename_all = "snake_case")]
pub enum ModalState {
    #[default]
    None,
    Login,
    Register,
    CreateUser,
    EditUser(EntityId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub email: String,
}

/// Result of a login attempt. Failures are reported here, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LoginOutcome {
    fn ok() -> Self {
        Self { success: true, error: None }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Read-only copy of the session for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub is_authenticated: bool,
    pub current_user: Option<CurrentUser>,
    pub is_loading: bool,
    pub modal: ModalState,
}

#[derive(Debug)]
struct SessionState {
    is_authenticated: bool,
    current_user: Option<CurrentUser>,
    token: Option<String>,
    is_loading: bool,
    modal: ModalState,
}

impl SessionState {
    fn loading() -> Self {
        Self {
            is_authenticated: false,
            current_user: None,
            token: None,
            is_loading: true,
            modal: ModalState::None,
        }
    }

    fn apply_persisted(&mut self, persisted: PersistedSession) {
        self.is_authenticated = persisted.is_logged_in();
        self.current_user = match (&persisted.token, persisted.email) {
            (Some(_), Some(email)) => Some(CurrentUser { email }),
            _ => None,
        };
        self.token = persisted.token;
    }

    fn clear_identity(&mut self) {
        self.is_authenticated = false;
        self.current_user = None;
        self.token = None;
    }
}

struct SessionInner {
    state: RwLock<SessionState>,
    store: Arc<dyn KeyValueStore>,
    auth: AuthService,
    events: AuthEvents,
    listener: Mutex<Option<JoinHandle<()>>>,
}

#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<SessionInner>,
}

impl SessionContext {
    pub fn new(auth: AuthService, store: Arc<dyn KeyValueStore>, events: AuthEvents) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                state: RwLock::new(SessionState::loading()),
                store,
                auth,
                events,
                listener: Mutex::new(None),
            }),
        }
    }

    /// Hydrate from persisted storage. `is_loading` is false afterwards even
    /// when storage could not be read.
    pub async fn initialize(&self) {
        self.reload_from_storage();
        let mut state = self.inner.state.write();
        state.is_loading = false;
        tracing::info!(authenticated = state.is_authenticated, "Session initialized");
    }

    /// Re-read storage whenever `auth:logout` fires. Idempotent.
    pub fn start_logout_listener(&self) {
        let mut slot = self.inner.listener.lock();
        if slot.is_some() {
            return;
        }

        let mut rx = self.inner.events.subscribe();
        let weak: Weak<SessionInner> = Arc::downgrade(&self.inner);
        *slot = Some(tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(AuthEvent::Logout) => {
                        let Some(inner) = weak.upgrade() else { break };
                        SessionContext { inner }.on_logout_signal();
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Session listener lagged behind auth events");
                        let Some(inner) = weak.upgrade() else { break };
                        SessionContext { inner }.on_logout_signal();
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }));
    }

    /// Stop the logout listener. The context stays usable.
    pub fn shutdown(&self) {
        if let Some(handle) = self.inner.listener.lock().take() {
            handle.abort();
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> LoginOutcome {
        let token = match self.inner.auth.issue_token(email, password).await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(email, error = %e, "Login failed");
                return LoginOutcome::failed(login_error_message(&e));
            }
        };

        if let Err(e) = PersistedSession::write(self.inner.store.as_ref(), &token.access_token, email) {
            tracing::error!(error = %e, "Failed to persist session");
            // don't leave half a session behind
            if let Err(e) = PersistedSession::clear(self.inner.store.as_ref()) {
                tracing::error!(error = %e, "Failed to clear partially persisted session");
            }
            return LoginOutcome::failed("No se pudo guardar la sesión");
        }

        let mut state = self.inner.state.write();
        state.is_authenticated = true;
        state.current_user = Some(CurrentUser {
            email: email.to_string(),
        });
        state.token = Some(token.access_token);
        state.modal = ModalState::None;
        tracing::info!(email, "Logged in");
        LoginOutcome::ok()
    }

    /// Create the account, then sign in with it
    pub async fn register(&self, email: &str, password: &str) -> LoginOutcome {
        if let Err(e) = self.inner.auth.register(email, password).await {
            tracing::warn!(email, error = %e, "Registration failed");
            return LoginOutcome::failed(e.to_string());
        }
        self.login(email, password).await
    }

    pub fn logout(&self) {
        if let Err(e) = PersistedSession::clear(self.inner.store.as_ref()) {
            tracing::error!(error = %e, "Failed to clear persisted session");
        }
        let mut state = self.inner.state.write();
        if state.is_authenticated {
            tracing::info!("Logged out");
        }
        state.clear_identity();
    }

    pub fn open_login_modal(&self) {
        self.set_modal(ModalState::Login);
    }

    pub fn open_register_modal(&self) {
        self.set_modal(ModalState::Register);
    }

    pub fn open_create_user_modal(&self) {
        self.set_modal(ModalState::CreateUser);
    }

    pub fn open_edit_user_modal(&self, user_id: EntityId) {
        self.set_modal(ModalState::EditUser(user_id));
    }

    pub fn close_modals(&self) {
        self.set_modal(ModalState::None);
    }

    pub fn modal(&self) -> ModalState {
        self.inner.state.read().modal
    }

    pub fn selected_user_id(&self) -> Option<EntityId> {
        match self.modal() {
            ModalState::EditUser(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.read().is_authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.read().is_loading
    }

    pub fn current_user(&self) -> Option<CurrentUser> {
        self.inner.state.read().current_user.clone()
    }

    pub fn token(&self) -> Option<String> {
        self.inner.state.read().token.clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.inner.state.read();
        SessionSnapshot {
            is_authenticated: state.is_authenticated,
            current_user: state.current_user.clone(),
            is_loading: state.is_loading,
            modal: state.modal,
        }
    }

    fn set_modal(&self, modal: ModalState) {
        let mut state = self.inner.state.write();
        if state.modal != modal {
            tracing::debug!(from = ?state.modal, to = ?modal, "Modal change");
            state.modal = modal;
        }
    }

    fn reload_from_storage(&self) {
        let persisted = match PersistedSession::read(self.inner.store.as_ref()) {
            Ok(persisted) => persisted,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read persisted session, treating as logged out");
                PersistedSession::default()
            }
        };
        self.inner.state.write().apply_persisted(persisted);
    }

    fn on_logout_signal(&self) {
        self.reload_from_storage();
        tracing::info!(
            authenticated = self.is_authenticated(),
            "Session re-read after auth:logout"
        );
    }
}

fn login_error_message(err: &ApiError) -> String {
    match err {
        ApiError::InvalidCredentials => "Correo o contraseña incorrectos".to_string(),
        ApiError::Network(_) => "No se pudo conectar con el servidor".to_string(),
        other => other.to_string(),
    }
}
