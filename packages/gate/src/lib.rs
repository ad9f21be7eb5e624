#![doc = include_str!("../README.md")]

mod client;
mod config;
mod error;
mod gate;
mod query;
mod session;
mod tokens;

pub use client::{HttpProfileApi, ProfileApi};
pub use config::GateConfig;
pub use error::ApiError;
pub use gate::{use_auth, AuthServices, GateProviders, ProfileGate};
pub use query::{use_profile_query, ProfileQuery, QueryPhase};
pub use session::{use_session, CurrentUser, Session, SessionProvider};
pub use tokens::{LoginRedirect, MemoryTokenStore, NavigatorRedirect, StoredTokens, TokenStore};

#[cfg(target_arch = "wasm32")]
pub use tokens::WebStorageTokens;
