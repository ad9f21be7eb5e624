//! Configuration for the gate's collaborators.

use serde::{Deserialize, Serialize};

/// Where the gate finds its profile endpoint and login route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Base URL of the API serving the profile endpoint.
    pub api_base: String,
    /// Path of the profile endpoint, appended to `api_base`.
    pub profile_path: String,
    /// Route pushed through the router when credentials are rejected.
    pub login_route: String,
    /// Storage key under which credentials are persisted.
    pub storage_key: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:8080".to_string(),
            profile_path: "/api/auth/profile".to_string(),
            login_route: "/login".to_string(),
            storage_key: "profile-gate.tokens".to_string(),
        }
    }
}

impl GateConfig {
    /// Defaults with `PROFILE_GATE_API_BASE` and `PROFILE_GATE_LOGIN_ROUTE`
    /// environment overrides applied. A convenience for demo and desktop
    /// targets; wasm builds just use [`Default`].
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(api_base) = std::env::var("PROFILE_GATE_API_BASE") {
            config.api_base = api_base;
        }
        if let Ok(login_route) = std::env::var("PROFILE_GATE_LOGIN_ROUTE") {
            config.login_route = login_route;
        }
        config
    }

    /// Full URL of the profile endpoint.
    pub fn profile_url(&self) -> String {
        format!("{}{}", self.api_base.trim_end_matches('/'), self.profile_path)
    }
}
