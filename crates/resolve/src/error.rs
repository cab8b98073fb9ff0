use std::time::Duration;
use thiserror::Error;

/// Failure of one call to the external resolution provider.
///
/// Every variant is retryable; access revocation is reported through
/// [`InspectedContent::accessible`](crate::InspectedContent) instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Upstream asked us to slow down for `retry_after`.
    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited {
        /// Suggested wait before the next call.
        retry_after: Duration,
    },
    /// Network or server-side failure.
    #[error("transient upstream failure: {0}")]
    Transient(String),
    /// The call did not complete within the per-call timeout.
    #[error("upstream call timed out after {0:?}")]
    Timeout(Duration),
}

/// The request URL is stripped: Bot API URLs embed the token.
impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Transient(err.without_url().to_string())
    }
}

/// Failure reading the persistent override store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file could not be read.
    #[error("failed to read override store: {0}")]
    Io(#[from] std::io::Error),
    /// The backing file is not a valid record list.
    #[error("failed to parse override store: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Why the bounded retry loop gave up.
///
/// The resolver reports both cases to callers as not-found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Upstream asked for a longer pause than we are willing to block for.
    #[error("suggested wait {retry_after:?} exceeds the cap of {cap:?}")]
    WaitTooLong {
        /// Wait upstream suggested.
        retry_after: Duration,
        /// Largest wait the policy honours.
        cap: Duration,
    },
    /// Every attempt failed.
    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted {
        /// Attempts made.
        attempts: u32,
        /// Failure of the final attempt.
        last: ProviderError,
    },
}

/// The Telegram provider could not be constructed.
#[derive(Debug, Error)]
pub enum SetupError {
    /// No bot token in the environment.
    #[error("bot token is not set")]
    MissingToken,
    /// No chat to forward messages into.
    #[error("inspection chat id is not set")]
    MissingInspectionChat,
    /// The HTTP client failed to build.
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}
