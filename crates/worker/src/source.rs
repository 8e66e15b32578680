//! Where the adapter reads document text from.

use graphql_types::DocumentUri;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// One open buffer as the host mirrors it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MirrorModel {
    pub uri: DocumentUri,
    pub version: i32,
    pub text: Arc<str>,
}

impl MirrorModel {
    #[must_use]
    pub fn new(uri: impl Into<DocumentUri>, version: i32, text: impl Into<Arc<str>>) -> Self {
        Self {
            uri: uri.into(),
            version,
            text: text.into(),
        }
    }
}

/// The host's set of open documents.
///
/// Reads are synchronous; the adapter takes a fresh snapshot on every
/// request and never writes.
pub trait TextSource: Send + Sync {
    fn list_open_documents(&self) -> Vec<MirrorModel>;
}

/// In-memory [`TextSource`] kept up to date by open/change/close events.
#[derive(Debug, Default)]
pub struct MirrorModels {
    models: RwLock<BTreeMap<DocumentUri, MirrorModel>>,
}

impl MirrorModels {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a buffer.
    pub fn open(&self, model: MirrorModel) {
        tracing::debug!(uri = %model.uri, version = model.version, "Document opened");
        self.models.write().insert(model.uri.clone(), model);
    }

    /// Replace a buffer's text. Stale versions are ignored.
    ///
    /// Returns `false` when the change was not applied.
    pub fn change(&self, model: MirrorModel) -> bool {
        let mut models = self.models.write();
        if let Some(current) = models.get(&model.uri) {
            if current.version > model.version {
                tracing::debug!(
                    uri = %model.uri,
                    current = current.version,
                    received = model.version,
                    "Ignoring stale change"
                );
                return false;
            }
        }
        models.insert(model.uri.clone(), model);
        true
    }

    /// Drop a buffer. Returns `false` if it was not open.
    pub fn close(&self, uri: &DocumentUri) -> bool {
        self.models.write().remove(uri).is_some()
    }

    #[must_use]
    pub fn get(&self, uri: &DocumentUri) -> Option<MirrorModel> {
        self.models.read().get(uri).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.models.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.read().is_empty()
    }
}

impl TextSource for MirrorModels {
    fn list_open_documents(&self) -> Vec<MirrorModel> {
        self.models.read().values().cloned().collect()
    }
}
