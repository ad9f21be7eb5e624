//! Locally stored credentials and the login redirect.
//!
//! The gate never inspects token contents beyond a freshness judgment, and it
//! never performs navigation itself. Both capabilities live behind traits so
//! tests and non-browser targets can substitute their own.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use dioxus::router::Navigator;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Credentials as they sit in local storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTokens {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl StoredTokens {
    /// A bare access token with no refresh token and no expiry.
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            expires_at: None,
        }
    }

    /// Attach an expiry instant.
    pub fn expiring_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Whether these credentials still look usable at `now`: a non-empty
    /// access token that has not passed its expiry. Tokens without an expiry
    /// are taken at face value; the profile endpoint is the real judge.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        !self.access_token.is_empty() && self.expires_at.is_none_or(|expires| expires > now)
    }
}

/// Read/write access to wherever credentials are persisted.
pub trait TokenStore {
    fn load(&self) -> Option<StoredTokens>;
    fn save(&self, tokens: &StoredTokens);
    fn clear(&self);

    /// Synchronous, side-effect-free freshness judgment. Safe to call on
    /// every render.
    fn tokens_appear_valid(&self) -> bool {
        self.load().is_some_and(|tokens| tokens.is_fresh(Utc::now()))
    }
}

/// In-memory token store for native targets and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryTokenStore {
    tokens: Rc<RefCell<Option<StoredTokens>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: StoredTokens) -> Self {
        Self {
            tokens: Rc::new(RefCell::new(Some(tokens))),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<StoredTokens> {
        self.tokens.borrow().clone()
    }

    fn save(&self, tokens: &StoredTokens) {
        *self.tokens.borrow_mut() = Some(tokens.clone());
    }

    fn clear(&self) {
        *self.tokens.borrow_mut() = None;
    }
}

/// Browser `localStorage` token store, JSON-encoded under a single key.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct WebStorageTokens {
    key: String,
}

#[cfg(target_arch = "wasm32")]
impl WebStorageTokens {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage(&self) -> Option<web_sys::Storage> {
        web_sys::window().and_then(|window| window.local_storage().ok().flatten())
    }
}

#[cfg(target_arch = "wasm32")]
impl TokenStore for WebStorageTokens {
    fn load(&self) -> Option<StoredTokens> {
        let raw = self.storage()?.get_item(&self.key).ok().flatten()?;
        match serde_json::from_str(&raw) {
            Ok(tokens) => Some(tokens),
            Err(err) => {
                warn!(key = %self.key, "discarding unreadable stored tokens: {err}");
                None
            }
        }
    }

    fn save(&self, tokens: &StoredTokens) {
        let Some(storage) = self.storage() else {
            warn!("localStorage unavailable, tokens not persisted");
            return;
        };
        match serde_json::to_string(tokens) {
            Ok(raw) => {
                if storage.set_item(&self.key, &raw).is_err() {
                    warn!(key = %self.key, "localStorage rejected token write");
                }
            }
            Err(err) => warn!("failed to encode tokens: {err}"),
        }
    }

    fn clear(&self) {
        if let Some(storage) = self.storage() {
            let _ = storage.remove_item(&self.key);
        }
    }
}

/// Fire-and-forget navigation to the login screen.
///
/// Implementations must be idempotent: the gate may invoke this once per
/// failure event, and repeated failures repeat the call.
pub trait LoginRedirect {
    fn redirect_to_login(&self);
}

/// Pushes the configured login route through the Dioxus router.
#[derive(Clone)]
pub struct NavigatorRedirect {
    navigator: Navigator,
    login_route: String,
}

impl NavigatorRedirect {
    pub fn new(navigator: Navigator, login_route: impl Into<String>) -> Self {
        Self {
            navigator,
            login_route: login_route.into(),
        }
    }
}

impl LoginRedirect for NavigatorRedirect {
    fn redirect_to_login(&self) {
        debug!(route = %self.login_route, "redirecting to login");
        if self.navigator.push(self.login_route.as_str()).is_some() {
            warn!(route = %self.login_route, "login redirect failed");
        }
    }
}
