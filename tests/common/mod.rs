#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use httpmock::MockServer;
use parking_lot::Mutex;

use bambino_admin::app::{App, LoginAffordance};
use bambino_admin::config::AppConfig;
use bambino_admin::session::Navigator;
use bambino_admin::storage::{KeyValueStore, MemoryStore, PersistedSession};

pub const TOKEN: &str = "test-token";
pub const EMAIL: &str = "admin@bambino.edu";

#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        self.routes.lock().push(route.to_string());
    }
}

/// A mock backend plus an app wired against it
pub struct Harness {
    pub server: MockServer,
    pub store: Arc<MemoryStore>,
    pub navigator: Arc<RecordingNavigator>,
    pub app: App,
}

impl Harness {
    pub async fn start(affordance: LoginAffordance, logged_in: bool) -> Harness {
        Self::start_with(affordance, logged_in, |_| {}).await
    }

    pub async fn start_with<F>(affordance: LoginAffordance, logged_in: bool, configure: F) -> Harness
    where
        F: FnOnce(&mut AppConfig),
    {
        let server = MockServer::start();
        let mut config = test_config(&server.base_url());
        configure(&mut config);

        let store = Arc::new(MemoryStore::new());
        if logged_in {
            PersistedSession::write(store.as_ref(), TOKEN, EMAIL).expect("seed session");
        }

        let navigator = Arc::new(RecordingNavigator::default());
        let app = App::bootstrap(
            config,
            store.clone(),
            navigator.clone(),
            affordance,
        )
        .await
        .expect("bootstrap app");

        Harness {
            server,
            store,
            navigator,
            app,
        }
    }

    /// Logged in, with the login modal as the recovery affordance
    pub async fn logged_in() -> Harness {
        Self::start(LoginAffordance::Modal, true).await
    }

    pub fn stored_token(&self) -> Option<String> {
        self.store.get("token").expect("read store")
    }
}

pub fn test_config(base_url: &str) -> AppConfig {
    let mut config = AppConfig::for_base_url(base_url);
    config.session.relogin_modal_delay_ms = 100;
    config.session.relogin_redirect_delay_ms = 100;
    config.api.request_timeout_secs = 5;
    config
}

/// Poll until `cond` holds; background tasks (logout listener, recovery)
/// run on their own schedule.
pub async fn wait_until<F: Fn() -> bool>(cond: F) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    cond()
}
