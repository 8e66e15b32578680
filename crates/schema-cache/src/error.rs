use graphql_config::ScopeKey;
use graphql_introspect::TransportError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SchemaError>;

/// Why a scope has no usable schema.
///
/// `Clone` because every waiter of a coalesced fetch receives the same value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The transport could not deliver the payload. Retried once the
    /// negative cache entry expires.
    #[error("Failed to fetch schema: {0}")]
    Fetch(#[from] TransportError),

    /// The payload is not a valid schema. Kept until reload or reconfigure.
    #[error("Invalid schema: {0}")]
    Parse(String),

    /// The scope points at a URL but no transport may fetch it.
    #[error("Schema requests are unavailable, cannot fetch {0}")]
    TransportUnavailable(String),

    /// No schema source is configured for the scope.
    #[error("No schema configured for scope '{0}'")]
    NotConfigured(ScopeKey),
}

impl SchemaError {
    /// Only transport failures go away on their own.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }

    /// Stable diagnostic code for editor display.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "schema-fetch-error",
            Self::Parse(_) => "schema-parse-error",
            Self::TransportUnavailable(_) | Self::NotConfigured(_) => "schema-unavailable",
        }
    }
}
