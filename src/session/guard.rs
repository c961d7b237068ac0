//! Session-aware request wrapper.
//!
//! Any resource call can be run through [`SessionGuard::safe_request`]. An
//! expired session is turned into a user-visible message plus a delayed
//! re-login affordance, and the call resolves to `None`. Every other error
//! is handed back untouched for the caller to classify.

use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use super::context::SessionContext;
use crate::config::SessionConfig;
use crate::error::ApiError;

/// Route changes, for when no login modal is available
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

/// Navigator that only records the requested route in the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, route: &str) {
        tracing::info!(route, "Navigation requested");
    }
}

#[derive(Debug, Clone)]
pub struct RecoveryPolicy {
    pub modal_delay: Duration,
    pub redirect_delay: Duration,
    pub login_route: String,
}

impl From<&SessionConfig> for RecoveryPolicy {
    fn from(config: &SessionConfig) -> Self {
        Self {
            modal_delay: config.modal_delay(),
            redirect_delay: config.redirect_delay(),
            login_route: config.login_route.clone(),
        }
    }
}

#[derive(Clone)]
pub struct SessionGuard {
    session: Option<SessionContext>,
    navigator: Arc<dyn Navigator>,
    policy: RecoveryPolicy,
    pending: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl SessionGuard {
    /// `session` provides the login modal; without one, recovery falls back
    /// to navigating to the login route.
    pub fn new(session: Option<SessionContext>, navigator: Arc<dyn Navigator>, policy: RecoveryPolicy) -> Self {
        Self {
            session,
            navigator,
            policy,
            pending: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Run `operation`.
    ///
    /// * success: `Ok(Some(value))`
    /// * session expired: `report_error(context_message)`, schedule recovery, `Ok(None)`
    /// * anything else: `Err(error)` unchanged
    pub async fn safe_request<T, F, Fut, R>(
        &self,
        operation: F,
        report_error: R,
        context_message: &str,
    ) -> Result<Option<T>, ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
        R: FnOnce(&str),
    {
        match operation().await {
            Ok(value) => Ok(Some(value)),
            Err(ApiError::SessionExpired) => {
                tracing::warn!(context = context_message, "Session expired during request");
                report_error(context_message);
                self.schedule_recovery();
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Wait for every scheduled recovery to run
    pub async fn settle(&self) {
        let handles = std::mem::take(&mut *self.pending.lock());
        for handle in handles {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    tracing::error!(error = %e, "Session recovery task failed");
                }
            }
        }
    }

    pub fn abort_pending(&self) {
        for handle in self.pending.lock().drain(..) {
            handle.abort();
        }
    }

    pub fn has_pending_recovery(&self) -> bool {
        self.pending.lock().iter().any(|h| !h.is_finished())
    }

    fn schedule_recovery(&self) {
        let mut pending = self.pending.lock();
        pending.retain(|h| !h.is_finished());
        if !pending.is_empty() {
            // one re-login prompt is enough for a burst of 401s
            return;
        }

        let handle = match &self.session {
            Some(session) => {
                let session = session.clone();
                let delay = self.policy.modal_delay;
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    session.open_login_modal();
                })
            }
            None => {
                let navigator = Arc::clone(&self.navigator);
                let delay = self.policy.redirect_delay;
                let route = self.policy.login_route.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    navigator.navigate(&route);
                })
            }
        };
        pending.push(handle);
    }
}
