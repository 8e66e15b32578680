//! The facade the host calls into.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use graphql_config::{FormattingOptions, LanguageSettings, ScopeKey};
use graphql_ide::{
    Analysis, AnalysisEngine, CompletionItem, Diagnostic, Hover, SymbolInformation,
    DIAGNOSTIC_SOURCE,
};
use graphql_introspect::SchemaTransport;
use graphql_schema_cache::{SchemaCache, SchemaEntry, SchemaError};
use graphql_types::{DiagnosticSeverity, Document, DocumentUri, Position, Range, TextEdit};

use crate::error::{AdapterError, Result};
use crate::source::TextSource;

/// Language id given to every document snapshot.
pub const DEFAULT_LANGUAGE_ID: &str = "graphql";

/// Connects the host's open buffers, the schema cache and an analysis engine.
///
/// Every operation takes a fresh snapshot of the requested document. A
/// document the host does not have open yields an empty result, except for
/// [`complete`](Self::complete) which reports
/// [`AdapterError::DocumentNotFound`].
pub struct WorkerAdapter {
    language_id: String,
    source: Arc<dyn TextSource>,
    cache: SchemaCache,
    engine: Arc<dyn AnalysisEngine>,
}

impl std::fmt::Debug for WorkerAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerAdapter")
            .field("language_id", &self.language_id)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl WorkerAdapter {
    /// Create an adapter backed by the default [`Analysis`] engine.
    #[must_use]
    pub fn new(
        source: Arc<dyn TextSource>,
        transport: Option<Arc<dyn SchemaTransport>>,
        settings: LanguageSettings,
    ) -> Self {
        Self {
            language_id: DEFAULT_LANGUAGE_ID.to_string(),
            source,
            cache: SchemaCache::new(settings, transport),
            engine: Arc::new(Analysis::new()),
        }
    }

    #[must_use]
    pub fn with_engine(mut self, engine: Arc<dyn AnalysisEngine>) -> Self {
        self.engine = engine;
        self
    }

    #[must_use]
    pub fn with_language_id(mut self, language_id: impl Into<String>) -> Self {
        self.language_id = language_id.into();
        self
    }

    /// Current settings snapshot.
    #[must_use]
    pub fn settings(&self) -> Arc<LanguageSettings> {
        self.cache.settings()
    }

    /// The schema cache shared by all operations.
    #[must_use]
    pub const fn schema_cache(&self) -> &SchemaCache {
        &self.cache
    }

    /// Swap the settings and evict every scope whose configuration changed.
    ///
    /// Requests already waiting on a fetch finish with the old schema.
    #[tracing::instrument(skip_all)]
    pub fn reconfigure(&self, settings: LanguageSettings) -> Vec<ScopeKey> {
        let evicted = self.cache.configure(settings);
        tracing::info!(evicted = evicted.len(), "Settings replaced");
        evicted
    }

    /// Schema serving `uri`, fetching it if needed.
    pub async fn schema(&self, uri: &DocumentUri) -> std::result::Result<Arc<SchemaEntry>, SchemaError> {
        let scope = self.cache.scope_for(uri);
        self.cache.get_schema(&scope).await
    }

    /// Diagnostics for a document.
    ///
    /// When the schema is unusable, the document is still checked for syntax
    /// and a warning describing the schema failure is added at its start.
    #[tracing::instrument(skip(self, uri), fields(uri = %uri))]
    pub async fn validate(&self, uri: &DocumentUri) -> Vec<Diagnostic> {
        let Some(document) = self.document(uri) else {
            return Vec::new();
        };

        let schema = self.schema(uri).await;
        let rules = self.settings().validation_rules.clone();
        let entry = schema.as_ref().ok().map(Arc::as_ref);

        let mut diagnostics = isolate("validate", || self.engine.diagnostics(&document, entry, &rules))
            .unwrap_or_default();

        if let Err(error) = &schema {
            diagnostics.insert(0, schema_diagnostic(error));
        }

        tracing::debug!(count = diagnostics.len(), "Validated document");
        diagnostics
    }

    /// Completion items at `position`.
    ///
    /// An unusable schema degrades to schema-less completion.
    #[tracing::instrument(skip(self, uri), fields(uri = %uri))]
    pub async fn complete(&self, uri: &DocumentUri, position: Position) -> Result<Vec<CompletionItem>> {
        let document = self
            .document(uri)
            .ok_or_else(|| AdapterError::DocumentNotFound(uri.clone()))?;

        let schema = self.schema(uri).await;
        if let Err(error) = &schema {
            tracing::debug!(error = %error, "Completing without schema");
        }
        let entry = schema.as_ref().ok().map(Arc::as_ref);

        let items = isolate("complete", || self.engine.completions(&document, position, entry))?;
        tracing::debug!(count = items.len(), "Completed");
        Ok(items)
    }

    /// Fill in `detail` and `documentation` of a completion item.
    ///
    /// Uses only the schema already cached for the item's scope; nothing is
    /// fetched. Fields already present are never changed.
    #[tracing::instrument(skip_all, fields(label = %item.label))]
    pub fn resolve_completion_item(&self, item: CompletionItem) -> CompletionItem {
        let entry = item
            .data
            .as_ref()
            .and_then(|data| self.cache.peek(&ScopeKey::new(data.scope())));

        let original = item.clone();
        isolate("resolve", || self.engine.resolve_completion(item, entry.as_deref()))
            .unwrap_or(original)
    }

    /// Hover information at `position`.
    #[tracing::instrument(skip(self, uri), fields(uri = %uri))]
    pub async fn hover(&self, uri: &DocumentUri, position: Position) -> Option<Hover> {
        let document = self.document(uri)?;
        let schema = self.schema(uri).await.ok();
        isolate("hover", || self.engine.hover(&document, position, schema.as_deref()))
            .ok()
            .flatten()
    }

    /// Edits formatting the part of the document covered by `range`.
    ///
    /// `None` options fall back to the configured formatting options.
    #[tracing::instrument(skip(self, uri, options), fields(uri = %uri))]
    pub fn format(
        &self,
        uri: &DocumentUri,
        range: Range,
        options: Option<FormattingOptions>,
    ) -> Vec<TextEdit> {
        let Some(document) = self.document(uri) else {
            return Vec::new();
        };
        let options = options.unwrap_or_else(|| self.settings().formatting_options.clone());
        isolate("format", || self.engine.format(&document, range.normalized(), &options))
            .unwrap_or_default()
    }

    /// Refetch the schema serving `uri`.
    ///
    /// Returns `false` on failure; the previously cached schema stays in use.
    #[tracing::instrument(skip(self, uri), fields(uri = %uri))]
    pub async fn reload_schema(&self, uri: &DocumentUri) -> bool {
        let scope = self.cache.scope_for(uri);
        match self.cache.reload(&scope).await {
            Ok(_) => true,
            Err(error) => {
                tracing::warn!(scope = %scope, error = %error, "Schema reload failed");
                false
            }
        }
    }

    /// Outline of a document.
    #[tracing::instrument(skip(self, uri), fields(uri = %uri))]
    pub fn document_symbols(&self, uri: &DocumentUri) -> Vec<SymbolInformation> {
        let Some(document) = self.document(uri) else {
            return Vec::new();
        };
        isolate("document_symbols", || self.engine.document_symbols(&document))
            .unwrap_or_default()
    }

    /// Snapshot of the open buffer with exactly this URI.
    fn document(&self, uri: &DocumentUri) -> Option<Document> {
        let model = self
            .source
            .list_open_documents()
            .into_iter()
            .find(|model| model.uri == *uri);
        if model.is_none() {
            tracing::debug!(uri = %uri, "Document is not open");
        }
        model.map(|model| Document::new(model.uri, self.language_id.clone(), model.version, model.text))
    }
}

/// Run an engine call, turning a panic into [`AdapterError::Analysis`].
fn isolate<T>(operation: &'static str, f: impl FnOnce() -> T) -> Result<T> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        tracing::error!(operation, panic = %message, "Analysis engine panicked");
        AdapterError::Analysis(message)
    })
}

/// Warning reported at the start of a document whose schema is unusable.
fn schema_diagnostic(error: &SchemaError) -> Diagnostic {
    Diagnostic::new(
        Range::default(),
        DiagnosticSeverity::Warning,
        error.to_string(),
        DIAGNOSTIC_SOURCE,
    )
    .with_code(error.code())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{MirrorModel, MirrorModels};

    fn adapter(models: &Arc<MirrorModels>) -> WorkerAdapter {
        WorkerAdapter::new(
            Arc::clone(models) as Arc<dyn TextSource>,
            None,
            LanguageSettings::with_sdl("type Query { x: String }"),
        )
    }

    #[test]
    fn test_document_uses_exact_uri() {
        let models = Arc::new(MirrorModels::new());
        models.open(MirrorModel::new("file:///a.graphql", 3, "{ x }"));
        let adapter = adapter(&models).with_language_id("graphqlx");

        let document = adapter.document(&DocumentUri::new("file:///a.graphql")).unwrap();
        assert_eq!(document.version, 3);
        assert_eq!(document.language_id, "graphqlx");
        assert!(adapter.document(&DocumentUri::new("file:///A.graphql")).is_none());
    }

    #[test]
    fn test_isolate_captures_panic_message() {
        let result: Result<()> = isolate("test", || panic!("boom"));
        assert_eq!(result, Err(AdapterError::Analysis("boom".to_string())));

        let result: Result<()> = isolate("test", || panic!("{} {}", "formatted", 1));
        assert_eq!(result, Err(AdapterError::Analysis("formatted 1".to_string())));

        assert_eq!(isolate("test", || 7), Ok(7));
    }

    #[test]
    fn test_schema_diagnostic() {
        let diagnostic = schema_diagnostic(&SchemaError::Parse("bad".into()));
        assert_eq!(diagnostic.range, Range::default());
        assert_eq!(diagnostic.severity, DiagnosticSeverity::Warning);
        assert_eq!(diagnostic.code.as_deref(), Some("schema-parse-error"));
        assert_eq!(diagnostic.source, "graphql");
    }
}
