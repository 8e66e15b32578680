use graphql_schema_cache::SchemaError;
use graphql_types::DocumentUri;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AdapterError>;

/// Failure of a fallible adapter operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    /// The host has no open buffer with this URI.
    #[error("Document not found: {0}")]
    DocumentNotFound(DocumentUri),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The analysis engine panicked while serving the request.
    #[error("Analysis failed: {0}")]
    Analysis(String),
}

impl AdapterError {
    /// Stable error code for the host protocol.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::DocumentNotFound(_) => "document-not-found",
            Self::Schema(e) => e.code(),
            Self::Analysis(_) => "analysis-failed",
        }
    }
}
