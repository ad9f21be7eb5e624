//! The gate component and its context wiring.

use std::ptr;
use std::rc::Rc;

use dioxus::prelude::*;
use tracing::{debug, error};

use crate::client::ProfileApi;
use crate::query::{use_profile_query, QueryPhase};
use crate::session::{use_session, SessionProvider};
use crate::tokens::{LoginRedirect, TokenStore};

/// The gate's collaborators, bundled into a single context value.
#[derive(Clone)]
pub struct AuthServices {
    pub tokens: Rc<dyn TokenStore>,
    pub redirect: Rc<dyn LoginRedirect>,
    pub api: Rc<dyn ProfileApi>,
}

impl AuthServices {
    pub fn new(
        tokens: Rc<dyn TokenStore>,
        redirect: Rc<dyn LoginRedirect>,
        api: Rc<dyn ProfileApi>,
    ) -> Self {
        Self {
            tokens,
            redirect,
            api,
        }
    }

    pub fn tokens_appear_valid(&self) -> bool {
        self.tokens.tokens_appear_valid()
    }

    pub fn redirect_to_login(&self) {
        self.redirect.redirect_to_login();
    }
}

// Identity comparison is all memoization needs: services are wired once at
// startup and swapping any collaborator means a different allocation.
impl PartialEq for AuthServices {
    fn eq(&self, other: &Self) -> bool {
        ptr::addr_eq(Rc::as_ptr(&self.tokens), Rc::as_ptr(&other.tokens))
            && ptr::addr_eq(Rc::as_ptr(&self.redirect), Rc::as_ptr(&other.redirect))
            && ptr::addr_eq(Rc::as_ptr(&self.api), Rc::as_ptr(&other.api))
    }
}

/// The [`AuthServices`] provided by the nearest [`GateProviders`].
pub fn use_auth() -> AuthServices {
    use_context::<AuthServices>()
}

/// Wires a [`SessionProvider`] and the given [`AuthServices`] around its
/// children so apps and tests compose [`ProfileGate`] identically.
#[component]
pub fn GateProviders(services: AuthServices, children: Element) -> Element {
    use_context_provider(|| services);
    rsx! {
        SessionProvider { {children} }
    }
}

/// Gates its children behind an authenticated-profile fetch.
///
/// When stored credentials look valid the profile is refreshed through
/// [`use_profile_query`]; while that request is pending a full-viewport
/// loading placeholder is rendered instead of the children. A failure that
/// means the credentials are useless triggers the login redirect as a
/// fire-and-forget side effect. In every non-pending phase the children are
/// rendered unchanged, with no wrapper markup.
#[component]
pub fn ProfileGate(children: Element) -> Element {
    let auth = use_auth();
    let session = use_session();

    // Reading the shared user record subscribes the gate to login and logout
    // updates, so the freshness judgment below re-runs when the session
    // changes elsewhere. The value itself is not consulted: a fresh fetch is
    // always preferred over trusting a user record already in the session.
    let _user = session.current_user();

    // Re-judged on every render so credentials stored after mount are
    // honored.
    let should_fetch = auth.tokens_appear_valid();
    let query = use_profile_query(!should_fetch);

    // Classification and the redirect are side effects, kept off the render
    // path. The effect re-runs once per phase change, so a failure event
    // triggers exactly one redirect.
    let effect_auth = auth.clone();
    use_effect(move || {
        if let QueryPhase::Failed(err) = query.phase() {
            error!(
                status = ?err.status(),
                tokens_valid = effect_auth.tokens_appear_valid(),
                "failed to fetch user profile: {err}"
            );
            if err.requires_login() {
                debug!("stored credentials are unusable, redirecting to login");
                effect_auth.redirect_to_login();
            }
        }
    });

    if query.is_loading() {
        return rsx! {
            div { class: "min-h-screen flex items-center justify-center",
                div { class: "text-center",
                    div { class: "animate-spin rounded-full h-8 w-8 border-b-2 border-blue-500 mx-auto mb-4" }
                    p { class: "text-gray-600", "Loading user profile..." }
                }
            }
        };
    }

    // Failures fall through: they are logged (and possibly redirected) above,
    // never surfaced as a UI error state.
    rsx! {
        {children}
    }
}
