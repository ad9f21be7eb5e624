//! Shared session state: the currently authenticated user.
//!
//! The session is a plain signal handle passed down through context. The gate
//! only reads it; writes happen through [`Session::absorb_profile`] when the
//! profile query succeeds, or [`Session::clear`] on logout.

use dioxus::prelude::*;
use serde::{Deserialize, Serialize};

/// The authenticated user record as served by the profile endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Copyable handle over the shared authenticated-user signal.
#[derive(Clone, Copy, PartialEq)]
pub struct Session {
    user: Signal<Option<CurrentUser>>,
}

impl Session {
    /// Create a fresh, signed-out session. Must be called from within a
    /// reactive scope; [`SessionProvider`] does this for you.
    pub fn new() -> Self {
        Self {
            user: Signal::new(None),
        }
    }

    /// Reactive read of the current user. Components calling this re-render
    /// when the session changes.
    pub fn current_user(&self) -> Option<CurrentUser> {
        self.user.read().clone()
    }

    /// Read the current user without subscribing the caller.
    pub fn current_user_untracked(&self) -> Option<CurrentUser> {
        self.user.peek().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.read().is_some()
    }

    /// Absorb a freshly fetched profile. Called by the query layer on
    /// success; the gate itself never writes the session.
    pub fn absorb_profile(&self, profile: CurrentUser) {
        let mut user = self.user;
        user.set(Some(profile));
    }

    /// Drop the user record, e.g. on logout.
    pub fn clear(&self) {
        let mut user = self.user;
        user.set(None);
    }
}

/// Provides a [`Session`] to all children through context.
#[component]
pub fn SessionProvider(children: Element) -> Element {
    use_context_provider(Session::new);
    children
}

/// The [`Session`] provided by the nearest [`SessionProvider`].
pub fn use_session() -> Session {
    use_context::<Session>()
}
