//! Authenticated-user signal consumed by the realtime client.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// The signed-in user as reported by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: i64,
    pub user_name: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// Shared, observable sign-in state.
///
/// Cloning shares the underlying signal. `None` means unauthenticated.
#[derive(Clone)]
pub struct AuthState {
    user: Arc<watch::Sender<Option<AuthUser>>>,
}

impl AuthState {
    pub fn new() -> Self {
        let (user, _) = watch::channel(None);
        Self {
            user: Arc::new(user),
        }
    }

    pub fn signed_in(user: AuthUser) -> Self {
        let state = Self::new();
        state.set_user(Some(user));
        state
    }

    /// Replaces the current user, notifying watchers only on change.
    pub fn set_user(&self, user: Option<AuthUser>) {
        self.user.send_if_modified(|current| {
            if *current == user {
                return false;
            }
            *current = user;
            true
        });
    }

    pub fn sign_out(&self) {
        self.set_user(None);
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.borrow().is_some()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<AuthUser>> {
        self.user.subscribe()
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::new()
    }
}
