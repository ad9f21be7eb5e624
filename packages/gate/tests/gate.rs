//! End-to-end behavior of the gate: a VirtualDom is driven over stub
//! collaborators and the rendered output is inspected through ssr.

#![allow(non_snake_case)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use futures_util::future::LocalBoxFuture;
use futures_util::FutureExt;
use pretty_assertions::assert_eq;

use profile_gate::{
    use_session, ApiError, AuthServices, CurrentUser, GateProviders, LoginRedirect,
    MemoryTokenStore, ProfileApi, ProfileGate, StoredTokens,
};

/// Counts redirect invocations instead of navigating anywhere.
#[derive(Default, Clone)]
struct RecordingRedirect {
    calls: Rc<RefCell<u32>>,
}

impl RecordingRedirect {
    fn count(&self) -> u32 {
        *self.calls.borrow()
    }
}

impl LoginRedirect for RecordingRedirect {
    fn redirect_to_login(&self) {
        *self.calls.borrow_mut() += 1;
    }
}

/// Serves a canned outcome and counts how often it is asked.
#[derive(Clone)]
struct StubApi {
    outcome: Option<Result<CurrentUser, ApiError>>,
    hits: Rc<RefCell<u32>>,
}

impl StubApi {
    fn ok(user: CurrentUser) -> Self {
        Self {
            outcome: Some(Ok(user)),
            hits: Rc::default(),
        }
    }

    fn err(error: ApiError) -> Self {
        Self {
            outcome: Some(Err(error)),
            hits: Rc::default(),
        }
    }

    /// A request that never completes, to hold the gate in its pending state.
    fn hanging() -> Self {
        Self {
            outcome: None,
            hits: Rc::default(),
        }
    }

    fn hit_count(&self) -> u32 {
        *self.hits.borrow()
    }
}

impl ProfileApi for StubApi {
    fn fetch_profile(&self) -> LocalBoxFuture<'static, Result<CurrentUser, ApiError>> {
        *self.hits.borrow_mut() += 1;
        match self.outcome.clone() {
            Some(outcome) => async move { outcome }.boxed_local(),
            None => futures_util::future::pending().boxed_local(),
        }
    }
}

fn sample_user() -> CurrentUser {
    CurrentUser {
        id: "u1".to_string(),
        email: "user@example.com".to_string(),
        username: "user".to_string(),
        display_name: None,
    }
}

fn valid_tokens() -> MemoryTokenStore {
    MemoryTokenStore::with_tokens(StoredTokens::bearer("access"))
}

#[derive(Props, Clone, PartialEq)]
struct HarnessProps {
    services: AuthServices,
}

/// The gate wrapped around a recognizable child, plus a probe that renders
/// whatever user the session currently holds.
fn Harness(props: HarnessProps) -> Element {
    rsx! {
        GateProviders { services: props.services.clone(),
            ProfileGate {
                main { id: "content", "private content" }
                SessionProbe {}
            }
        }
    }
}

#[component]
fn SessionProbe() -> Element {
    let session = use_session();
    let label = session
        .current_user()
        .map(|user| user.username)
        .unwrap_or_else(|| "anonymous".to_string());
    rsx! {
        span { id: "probe", "{label}" }
    }
}

fn build(services: AuthServices) -> VirtualDom {
    let mut dom = VirtualDom::new_with_props(Harness, HarnessProps { services });
    dom.rebuild_in_place();
    dom
}

/// Drive tasks and re-renders until the dom has been quiet for a moment.
async fn settle(dom: &mut VirtualDom) {
    loop {
        tokio::select! {
            _ = dom.wait_for_work() => dom.render_immediate(&mut NoOpMutations),
            _ = tokio::time::sleep(Duration::from_millis(20)) => break,
        }
    }
}

#[tokio::test]
async fn invalid_tokens_skip_the_fetch_and_render_children_immediately() {
    let api = StubApi::ok(sample_user());
    let redirect = RecordingRedirect::default();
    let services = AuthServices::new(
        Rc::new(MemoryTokenStore::new()),
        Rc::new(redirect.clone()),
        Rc::new(api.clone()),
    );

    let mut dom = build(services);

    // Children are there on the very first render; no loading pass at all.
    let first = dioxus_ssr::render(&dom);
    assert!(first.contains("private content"), "got: {first}");
    assert!(!first.contains("Loading user profile"), "got: {first}");

    settle(&mut dom).await;

    assert_eq!(api.hit_count(), 0, "skipped query must not issue a request");
    assert_eq!(redirect.count(), 0);
    assert!(dioxus_ssr::render(&dom).contains("private content"));
}

#[tokio::test]
async fn pending_fetch_shows_the_placeholder_and_withholds_children() {
    let api = StubApi::hanging();
    let redirect = RecordingRedirect::default();
    let services = AuthServices::new(
        Rc::new(valid_tokens()),
        Rc::new(redirect.clone()),
        Rc::new(api.clone()),
    );

    let mut dom = build(services);
    settle(&mut dom).await;

    let html = dioxus_ssr::render(&dom);
    assert!(html.contains("Loading user profile..."), "got: {html}");
    assert!(!html.contains("private content"), "got: {html}");
    assert_eq!(api.hit_count(), 1);
    assert_eq!(redirect.count(), 0);
}

#[tokio::test]
async fn successful_fetch_passes_children_through_and_fills_the_session() {
    let api = StubApi::ok(sample_user());
    let redirect = RecordingRedirect::default();
    let services = AuthServices::new(
        Rc::new(valid_tokens()),
        Rc::new(redirect.clone()),
        Rc::new(api.clone()),
    );

    let mut dom = build(services);

    // In flight right after mount: the placeholder, not the children.
    let pending = dioxus_ssr::render(&dom);
    assert!(pending.contains("Loading user profile..."), "got: {pending}");

    settle(&mut dom).await;

    let html = dioxus_ssr::render(&dom);
    assert!(html.contains("private content"), "got: {html}");
    assert!(!html.contains("Loading user profile"), "got: {html}");
    // The probe sees the absorbed profile without the gate writing anything.
    assert!(html.contains(">user<"), "got: {html}");
    assert_eq!(redirect.count(), 0);
}

#[tokio::test]
async fn unauthorized_failure_redirects_once_and_still_renders_children() {
    let api = StubApi::err(ApiError::Unauthorized);
    let redirect = RecordingRedirect::default();
    let services = AuthServices::new(
        Rc::new(valid_tokens()),
        Rc::new(redirect.clone()),
        Rc::new(api.clone()),
    );

    let mut dom = build(services);
    settle(&mut dom).await;

    assert_eq!(redirect.count(), 1);
    let html = dioxus_ssr::render(&dom);
    assert!(html.contains("private content"), "got: {html}");
    assert!(html.contains(">anonymous<"), "session must stay empty, got: {html}");

    // Letting the dom idle again must not repeat the side effect.
    settle(&mut dom).await;
    assert_eq!(redirect.count(), 1);
}

#[tokio::test]
async fn transport_and_decode_failures_also_redirect() {
    for error in [
        ApiError::Transport("connection refused".to_string()),
        ApiError::Decode("expected value at line 1".to_string()),
    ] {
        let redirect = RecordingRedirect::default();
        let services = AuthServices::new(
            Rc::new(valid_tokens()),
            Rc::new(redirect.clone()),
            Rc::new(StubApi::err(error.clone())),
        );

        let mut dom = build(services);
        settle(&mut dom).await;

        assert_eq!(redirect.count(), 1, "expected a redirect for {error:?}");
        assert!(dioxus_ssr::render(&dom).contains("private content"));
    }
}

#[tokio::test]
async fn server_errors_are_absorbed_without_a_redirect() {
    let api = StubApi::err(ApiError::Status(500));
    let redirect = RecordingRedirect::default();
    let services = AuthServices::new(
        Rc::new(valid_tokens()),
        Rc::new(redirect.clone()),
        Rc::new(api.clone()),
    );

    let mut dom = build(services);
    settle(&mut dom).await;

    assert_eq!(redirect.count(), 0);
    let html = dioxus_ssr::render(&dom);
    assert!(html.contains("private content"), "got: {html}");
    assert!(!html.contains("Loading user profile"), "got: {html}");
}
