use thiserror::Error;

pub type Result<T> = std::result::Result<T, TransportError>;

/// Failure to retrieve a schema payload.
///
/// Cloned into every waiter of a coalesced fetch, so it carries strings
/// rather than the underlying client errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error {0}: {1}")]
    Http(u16, String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Invalid response: {0}")]
    Invalid(String),
}

impl TransportError {
    /// Network failures, timeouts and 5xx responses are worth retrying.
    /// 4xx responses and malformed bodies are not.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) => true,
            Self::Http(status, _) => *status >= 500,
            Self::Invalid(_) => false,
        }
    }
}

/// A schema payload that could not be turned into SDL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("Failed to parse introspection result: {0}")]
    Introspection(String),

    #[error("Schema endpoint returned errors: {0}")]
    ServerErrors(String),

    #[error("Schema payload is empty")]
    Empty,
}
