//! Classification of profile-fetch failures.

/// Why a profile fetch failed.
///
/// The gate only cares about one question: does this failure mean the stored
/// credentials are useless? [`ApiError::requires_login`] answers it.
/// Everything else about the failure is diagnostic detail for the logs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The endpoint rejected the request with 401.
    #[error("profile request was rejected as unauthorized")]
    Unauthorized,

    /// Any other non-success HTTP status.
    #[error("profile endpoint returned status {0}")]
    Status(u16),

    /// The request never produced a usable response (connect, TLS, timeout,
    /// interrupted body).
    #[error("could not reach the profile endpoint: {0}")]
    Transport(String),

    /// The response arrived but the body did not deserialize.
    #[error("could not decode the profile response: {0}")]
    Decode(String),
}

impl ApiError {
    /// The numeric HTTP status, when the failure carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::Status(status) => Some(*status),
            Self::Transport(_) | Self::Decode(_) => None,
        }
    }

    /// Whether this failure should send the user back to the login screen.
    ///
    /// Unauthorized responses mean the credentials were rejected outright.
    /// Transport and decode failures are treated the same way, since an
    /// unreachable or garbled profile endpoint leaves the session unusable.
    /// Every other status (including anything with no classification at all)
    /// stays where it is and is only logged.
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::Transport(_) | Self::Decode(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            if status == reqwest::StatusCode::UNAUTHORIZED {
                return Self::Unauthorized;
            }
            return Self::Status(status.as_u16());
        }
        if err.is_decode() {
            return Self::Decode(err.to_string());
        }
        Self::Transport(err.to_string())
    }
}
