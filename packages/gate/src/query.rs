//! The reactive profile query.
//!
//! [`use_profile_query`] wraps `use_resource` with two extra behaviors the
//! gate depends on: a skip flag that suppresses the request entirely, and
//! absorption of a successful fetch into the shared [`Session`]. The fetch
//! lifecycle itself stays with the resource; no caching or retry is layered
//! on top, so valid tokens always produce a fresh profile rather than
//! trusting whatever the session already holds.

use dioxus::prelude::*;
use tracing::debug;

use crate::error::ApiError;
use crate::gate::use_auth;
use crate::session::{use_session, CurrentUser};

/// The mutually exclusive states of a profile query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryPhase {
    /// The request was never issued because credentials did not look valid.
    Skipped,
    /// The request is in flight.
    Pending,
    /// The request succeeded; the session has already absorbed the profile.
    Ready(CurrentUser),
    /// The request failed.
    Failed(ApiError),
}

/// Copyable handle over a running (or skipped) profile query.
#[derive(Clone, Copy)]
pub struct ProfileQuery {
    skip: bool,
    resource: Resource<Option<Result<CurrentUser, ApiError>>>,
}

impl ProfileQuery {
    /// Reactive view of the query's phase.
    pub fn phase(&self) -> QueryPhase {
        if self.skip {
            return QueryPhase::Skipped;
        }
        match &*self.resource.read() {
            None => QueryPhase::Pending,
            // A leftover skip outcome from a previous render's decision.
            Some(None) => QueryPhase::Skipped,
            Some(Some(Ok(profile))) => QueryPhase::Ready(profile.clone()),
            Some(Some(Err(error))) => QueryPhase::Failed(error.clone()),
        }
    }

    /// True only while a real request is in flight. A skipped query is never
    /// loading.
    pub fn is_loading(&self) -> bool {
        !self.skip && self.resource.read().is_none()
    }

    pub fn data(&self) -> Option<CurrentUser> {
        match self.phase() {
            QueryPhase::Ready(profile) => Some(profile),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<ApiError> {
        match self.phase() {
            QueryPhase::Failed(error) => Some(error),
            _ => None,
        }
    }

    /// Issue the request again, replacing the current outcome.
    pub fn restart(&mut self) {
        self.resource.restart();
    }
}

/// Start (or skip) a profile fetch against the [`ProfileApi`] in context.
///
/// With `skip` set, the underlying future resolves immediately without
/// touching the API; no request is attempted and no pending phase is
/// observable. The flag participates in the resource's dependencies, so a
/// render that flips the decision restarts the query.
///
/// [`ProfileApi`]: crate::client::ProfileApi
pub fn use_profile_query(skip: bool) -> ProfileQuery {
    let auth = use_auth();
    let session = use_session();

    let resource = use_resource(use_reactive((&skip,), move |(skip,)| {
        let api = auth.api.clone();
        async move {
            if skip {
                return None;
            }
            let result = api.fetch_profile().await;
            if let Ok(profile) = &result {
                if session.current_user_untracked().is_none() {
                    debug!(user = %profile.username, "session populated from fetched profile");
                }
                session.absorb_profile(profile.clone());
            }
            Some(result)
        }
    }));

    ProfileQuery { skip, resource }
}
