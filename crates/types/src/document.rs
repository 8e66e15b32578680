//! Document snapshot types: [`DocumentUri`] and [`Document`].

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A URI string identifying an open editor buffer.
///
/// Compared by exact string equality, the same way the host compares its
/// mirror models. No normalisation is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentUri(Arc<str>);

impl DocumentUri {
    /// Create a new `DocumentUri` from a string.
    #[must_use]
    pub fn new(uri: impl Into<Arc<str>>) -> Self {
        Self(uri.into())
    }

    /// Get the URI as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The path component of the URI, without scheme, authority, query or fragment.
    ///
    /// `file:///src/app.graphql` yields `/src/app.graphql`,
    /// `inmemory://model/1` yields `/1`. Strings without a scheme are returned unchanged.
    #[must_use]
    pub fn path(&self) -> &str {
        let s = self.as_str();
        let without_suffix = s.split(['?', '#']).next().unwrap_or(s);
        let Some((_, rest)) = without_suffix.split_once("://") else {
            return without_suffix;
        };
        rest.find('/').map_or("", |slash| &rest[slash..])
    }
}

impl std::fmt::Display for DocumentUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DocumentUri {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for DocumentUri {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Read-only snapshot of an open document.
///
/// Built from the host's mirror set for a single request. A newer host
/// version produces a new snapshot; snapshots are never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub uri: DocumentUri,
    pub language_id: String,
    pub version: i32,
    pub text: Arc<str>,
}

impl Document {
    /// Create a new document snapshot.
    #[must_use]
    pub fn new(
        uri: impl Into<DocumentUri>,
        language_id: impl Into<String>,
        version: i32,
        text: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            uri: uri.into(),
            language_id: language_id.into(),
            version,
            text: text.into(),
        }
    }

    /// Document text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}
