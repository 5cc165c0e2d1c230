//! Cached session and change notification

use crate::auth::types::{AuthUser, Role};
use crate::error::Error;
use crate::store::{LocalStore, SESSION_KEY};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// The locally cached session for a signed-in account.
///
/// This is the record persisted under the session storage key. A stored
/// record missing any of the required fields fails validation on read and
/// the client behaves as signed out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// The account's email address
    pub email: String,

    /// The account's role
    pub role: Role,

    /// Display name, possibly blank
    #[serde(default)]
    pub display_name: String,

    /// Public handle, possibly blank
    #[serde(default)]
    pub handle: String,

    /// The current access token
    pub access: String,

    /// The refresh token
    pub refresh: String,
}

impl From<AuthUser> for Session {
    fn from(user: AuthUser) -> Self {
        Session {
            email: user.email,
            role: user.role,
            display_name: user.full_name,
            handle: user.handle,
            access: user.access,
            refresh: user.refresh,
        }
    }
}

/// Persisted session with subscribe/notify.
///
/// Reads go through to the underlying store on every call, so two clients
/// sharing a storage directory observe each other's writes. Subscribers are
/// notified on every session write and clear, mirroring the change events a
/// browser client fires for its navigation chrome.
pub struct SessionStore {
    store: Arc<LocalStore>,
    change_tx: broadcast::Sender<()>,
}

impl SessionStore {
    pub fn new(store: Arc<LocalStore>) -> Self {
        let (change_tx, _) = broadcast::channel(16);
        Self { store, change_tx }
    }

    /// The current session, or None when signed out.
    ///
    /// A stored record that fails validation, or one whose access token is
    /// empty, reads as signed out.
    pub fn session(&self) -> Option<Session> {
        self.store
            .get::<Session>(SESSION_KEY)
            .filter(|session| !session.access.is_empty())
    }

    /// The current access token, or None when signed out
    pub fn access_token(&self) -> Option<String> {
        self.session().map(|session| session.access)
    }

    /// Persist `session` and notify subscribers
    pub fn set(&self, session: &Session) -> Result<(), Error> {
        self.store.set(SESSION_KEY, session)?;
        self.notify();
        Ok(())
    }

    /// Drop the stored session and notify subscribers.
    ///
    /// Best effort: a storage failure is logged rather than surfaced, so the
    /// caller can always treat the session as gone afterwards.
    pub fn clear(&self) {
        if let Err(err) = self.store.remove(SESSION_KEY) {
            log::warn!("failed to remove stored session: {}", err);
        }
        self.notify();
    }

    /// Subscribe to session changes. An event fires on every sign-in,
    /// token refresh, profile update and sign-out.
    pub fn on_change(&self) -> broadcast::Receiver<()> {
        self.change_tx.subscribe()
    }

    fn notify(&self) {
        // send only fails when there are no subscribers
        let _ = self.change_tx.send(());
    }
}
