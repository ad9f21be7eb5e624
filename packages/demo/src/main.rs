//! A small routed app wrapped in the profile gate.
//!
//! The login screen stores a demo token; the gate then tries it against the
//! configured profile endpoint (`PROFILE_GATE_API_BASE` to override) and
//! redirects back to `/login` whenever the endpoint rejects it.

use std::rc::Rc;

use chrono::{Duration, Utc};
use dioxus::logger::tracing::{info, Level};
use dioxus::prelude::*;

use profile_gate::{
    use_auth, use_session, AuthServices, GateConfig, GateProviders, HttpProfileApi,
    MemoryTokenStore, NavigatorRedirect, ProfileGate, StoredTokens, TokenStore,
};

#[derive(Debug, Clone, PartialEq, Routable)]
enum Route {
    #[layout(Shell)]
    #[route("/")]
    Home {},
    #[route("/login")]
    Login {},
}

fn main() {
    dioxus::logger::init(Level::INFO).expect("failed to initialize logger");
    dioxus::launch(app);
}

fn app() -> Element {
    rsx! {
        Router::<Route> {}
    }
}

/// Wires the gate's collaborators once and gates everything the router
/// renders, the login screen included. On `/login` with no usable tokens the
/// query is skipped, so the screen shows without a loading pass.
#[component]
fn Shell() -> Element {
    let navigator = use_navigator();
    let services = use_hook(|| {
        let config = GateConfig::from_env();
        let tokens = platform_tokens(&config);
        AuthServices::new(
            tokens.clone(),
            Rc::new(NavigatorRedirect::new(navigator, config.login_route.clone())),
            Rc::new(HttpProfileApi::new(&config, tokens)),
        )
    });

    rsx! {
        GateProviders { services,
            ProfileGate {
                Outlet::<Route> {}
            }
        }
    }
}

fn platform_tokens(config: &GateConfig) -> Rc<dyn TokenStore> {
    #[cfg(target_arch = "wasm32")]
    {
        Rc::new(profile_gate::WebStorageTokens::new(config.storage_key.clone()))
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = config;
        Rc::new(MemoryTokenStore::new())
    }
}

#[component]
fn Home() -> Element {
    let session = use_session();

    rsx! {
        section { class: "p-8",
            h1 { "Workspace" }
            match session.current_user() {
                Some(user) => rsx! {
                    p { "Signed in as {user.username} ({user.email})" }
                },
                None => rsx! {
                    p {
                        "No profile loaded. "
                        Link { to: Route::Login {}, "Log in" }
                    }
                },
            }
        }
    }
}

#[component]
fn Login() -> Element {
    let auth = use_auth();
    let session = use_session();
    let navigator = use_navigator();
    let mut token = use_signal(String::new);

    rsx! {
        section { class: "p-8",
            h1 { "Log in" }
            p { "Paste an access token; the gate will try it against the profile endpoint." }
            input {
                value: "{token}",
                placeholder: "access token",
                oninput: move |evt| token.set(evt.value()),
            }
            button {
                onclick: move |_| {
                    let value = token();
                    if value.is_empty() {
                        return;
                    }
                    auth.tokens
                        .save(&StoredTokens::bearer(value).expiring_at(Utc::now() + Duration::hours(1)));
                    // Dropping the stale profile nudges the gate, which then
                    // refetches with the freshly stored token.
                    session.clear();
                    info!("stored demo token");
                    navigator.push(Route::Home {});
                },
                "Use token"
            }
        }
    }
}
