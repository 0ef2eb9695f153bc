// ── Session store ──
//
// Single-writer, multi-reader. Writers go through the store's methods;
// readers hold `watch` receivers and observe transitions.

use secrecy::SecretString;
use tokio::sync::watch;
use tracing::{debug, info};

use haven_api::HubClient;

use crate::error::CoreError;
use crate::model::{Session, UserProfile};

/// Holds the one active session, if any.
pub struct SessionStore {
    current: watch::Sender<Option<Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        let (current, _) = watch::channel(None);
        Self { current }
    }

    /// Authenticate against the hub and install the session.
    ///
    /// On failure the store is left untouched — a failed re-login does
    /// not tear down an existing session.
    pub async fn login(
        &self,
        client: &HubClient,
        username: &str,
        password: &SecretString,
    ) -> Result<Session, CoreError> {
        let user = client
            .login(username, password)
            .await
            .map_err(|e| match e {
                haven_api::Error::Authentication { message } => {
                    CoreError::AuthenticationFailed { message }
                }
                other => CoreError::Api(other),
            })?;

        let session = Session {
            user: UserProfile::from(user),
        };
        self.current.send_replace(Some(session.clone()));
        info!(user = %session.user.username, "session established");
        Ok(session)
    }

    /// Clear the session. Unconditional and infallible — logging out
    /// while logged out is a no-op.
    pub fn logout(&self) {
        if self.current.send_replace(None).is_some() {
            debug!("session cleared");
        }
    }

    /// React to a 401/403 observed anywhere: the hub no longer accepts
    /// our credentials, so drop the session. Returns `true` only on the
    /// transition from logged-in to logged-out, so callers can raise a
    /// single notice per expiry.
    pub fn note_unauthorized(&self) -> bool {
        self.current.send_replace(None).is_some()
    }

    /// The current session, if any.
    pub fn current(&self) -> Option<Session> {
        self.current.borrow().clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current.borrow().is_some()
    }

    /// Observe session transitions.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.current.subscribe()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;

    fn fake_session() -> Session {
        Session {
            user: UserProfile {
                id: "u1".into(),
                username: "alice".into(),
                role: Role::Admin,
            },
        }
    }

    #[test]
    fn logout_is_idempotent() {
        let store = SessionStore::new();
        store.logout();
        store.logout();
        assert!(!store.is_logged_in());
    }

    #[test]
    fn note_unauthorized_reports_transition_once() {
        let store = SessionStore::new();
        store.current.send_replace(Some(fake_session()));

        assert!(store.note_unauthorized());
        assert!(!store.note_unauthorized());
        assert!(!store.is_logged_in());
    }

    #[test]
    fn subscribers_observe_transitions() {
        let store = SessionStore::new();
        let rx = store.subscribe();
        assert!(rx.borrow().is_none());

        store.current.send_replace(Some(fake_session()));
        assert!(rx.borrow().is_some());

        store.logout();
        assert!(rx.borrow().is_none());
    }
}
