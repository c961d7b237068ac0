//! Process-wide auth signals.
//!
//! `auth:logout` carries no payload. Listeners must re-read session state
//! when they receive it.

use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    Logout,
}

impl AuthEvent {
    pub fn name(&self) -> &'static str {
        match self {
            AuthEvent::Logout => "auth:logout",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthEvents {
    tx: broadcast::Sender<AuthEvent>,
}

impl AuthEvents {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.tx.subscribe()
    }

    /// Fire `auth:logout`. Having no listeners is fine.
    pub fn logout(&self) {
        let delivered = self.tx.send(AuthEvent::Logout).unwrap_or(0);
        tracing::debug!(event = AuthEvent::Logout.name(), listeners = delivered, "Broadcast auth event");
    }
}

impl Default for AuthEvents {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_subscriber_sees_logout() {
        let events = AuthEvents::new();
        let mut a = events.subscribe();
        let mut b = events.subscribe();

        events.logout();

        assert_eq!(a.recv().await.unwrap(), AuthEvent::Logout);
        assert_eq!(b.recv().await.unwrap(), AuthEvent::Logout);
    }

    #[test]
    fn logout_without_listeners_does_not_fail() {
        AuthEvents::new().logout();
    }
}
