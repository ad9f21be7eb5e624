//! Transport for the profile fetch.

use std::rc::Rc;

use futures_util::future::LocalBoxFuture;
use futures_util::FutureExt;
use tracing::debug;

use crate::error::ApiError;
use crate::session::CurrentUser;
use crate::tokens::TokenStore;
use crate::GateConfig;

/// A source of profile records.
///
/// Object-safe so the gate can hold it behind `Rc<dyn ProfileApi>` in context
/// and tests can substitute canned responses.
pub trait ProfileApi {
    fn fetch_profile(&self) -> LocalBoxFuture<'static, Result<CurrentUser, ApiError>>;
}

/// HTTP implementation: GET the configured profile endpoint with a bearer
/// token from the token store, when one is present.
pub struct HttpProfileApi {
    client: reqwest::Client,
    profile_url: String,
    tokens: Rc<dyn TokenStore>,
}

impl HttpProfileApi {
    pub fn new(config: &GateConfig, tokens: Rc<dyn TokenStore>) -> Self {
        Self {
            client: reqwest::Client::new(),
            profile_url: config.profile_url(),
            tokens,
        }
    }
}

impl ProfileApi for HttpProfileApi {
    fn fetch_profile(&self) -> LocalBoxFuture<'static, Result<CurrentUser, ApiError>> {
        let client = self.client.clone();
        let url = self.profile_url.clone();
        // Read the token at request time, not at construction, so a login
        // that happened after this client was built is picked up.
        let access_token = self.tokens.load().map(|tokens| tokens.access_token);

        async move {
            debug!(%url, "requesting user profile");
            let mut request = client.get(&url);
            if let Some(token) = access_token {
                request = request.bearer_auth(token);
            }
            let user = request
                .send()
                .await?
                .error_for_status()?
                .json::<CurrentUser>()
                .await?;
            Ok(user)
        }
        .boxed_local()
    }
}
