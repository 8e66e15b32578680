use graphql_config::{FormattingOptions, LanguageSettings, ScopeKey};
use graphql_ide::{
    AnalysisEngine, CompletionItem, CompletionItemKind, Diagnostic, Hover, SymbolInformation,
    SymbolKind,
};
use graphql_introspect::{SchemaTransport, TransportError};
use graphql_schema_cache::SchemaEntry;
use graphql_test_utils::fixtures::{MINIMAL_SCHEMA, RICH_SCHEMA};
use graphql_test_utils::{extract_cursor, FakeTransport};
use graphql_types::{DiagnosticSeverity, Document, DocumentUri, Position, Range, TextEdit};
use graphql_worker::{AdapterError, MirrorModel, MirrorModels, TextSource, WorkerAdapter};
use std::sync::Arc;

const URL: &str = "https://api.example.com/graphql";
const DOC: &str = "file:///project/query.graphql";

fn uri() -> DocumentUri {
    DocumentUri::new(DOC)
}

fn open(text: &str) -> Arc<MirrorModels> {
    let models = Arc::new(MirrorModels::new());
    models.open(MirrorModel::new(DOC, 1, text));
    models
}

fn adapter_with(
    models: &Arc<MirrorModels>,
    settings: LanguageSettings,
    transport: Option<&Arc<FakeTransport>>,
) -> WorkerAdapter {
    let transport = transport.map(|t| Arc::clone(t) as Arc<dyn SchemaTransport>);
    WorkerAdapter::new(Arc::clone(models) as Arc<dyn TextSource>, transport, settings)
}

fn minimal_adapter(text: &str) -> WorkerAdapter {
    adapter_with(&open(text), LanguageSettings::with_sdl(MINIMAL_SCHEMA), None)
}

fn whole(text: &str) -> Range {
    let lines: Vec<&str> = text.split('\n').collect();
    let last = lines.last().map_or(0, |line| line.encode_utf16().count());
    Range::new(
        Position::new(0, 0),
        Position::new(lines.len() as u32 - 1, last as u32),
    )
}

// Missing documents

#[tokio::test]
async fn test_missing_document_behaviour() {
    let adapter = minimal_adapter("{ x }");
    let missing = DocumentUri::new("file:///project/other.graphql");

    assert!(adapter.validate(&missing).await.is_empty());
    assert!(adapter.hover(&missing, Position::new(0, 2)).await.is_none());
    assert!(adapter.document_symbols(&missing).is_empty());
    assert!(adapter
        .format(&missing, Range::default(), None)
        .is_empty());
    assert_eq!(
        adapter.complete(&missing, Position::new(0, 2)).await,
        Err(AdapterError::DocumentNotFound(missing.clone()))
    );
}

#[tokio::test]
async fn test_uri_match_is_exact() {
    let adapter = minimal_adapter("{ y }");
    let differently_cased = DocumentUri::new("file:///project/Query.graphql");
    assert!(adapter.validate(&differently_cased).await.is_empty());
    assert_eq!(adapter.validate(&uri()).await.len(), 1);
}

// Validation

#[tokio::test]
async fn test_valid_query_has_no_diagnostics() {
    let adapter = minimal_adapter("{ x }");
    assert_eq!(adapter.validate(&uri()).await, Vec::<Diagnostic>::new());
}

#[tokio::test]
async fn test_unknown_field_is_reported_at_the_field() {
    let adapter = minimal_adapter("{ y }");
    let diagnostics = adapter.validate(&uri()).await;

    assert_eq!(diagnostics.len(), 1);
    let diagnostic = &diagnostics[0];
    assert!(diagnostic.message.contains('y'), "{}", diagnostic.message);
    assert_eq!(diagnostic.severity, DiagnosticSeverity::Error);
    assert_eq!(diagnostic.range.start, Position::new(0, 2));
    assert_eq!(diagnostic.range.end, Position::new(0, 3));
}

#[tokio::test]
async fn test_validation_follows_buffer_changes() {
    let models = open("{ x }");
    let adapter = adapter_with(&models, LanguageSettings::with_sdl(MINIMAL_SCHEMA), None);
    assert!(adapter.validate(&uri()).await.is_empty());

    models.change(MirrorModel::new(DOC, 2, "{ x y }"));
    assert_eq!(adapter.validate(&uri()).await.len(), 1);

    models.close(&uri());
    assert!(adapter.validate(&uri()).await.is_empty());
}

#[tokio::test]
async fn test_missing_schema_adds_warning_and_keeps_syntax_errors() {
    let models = open("{ x");
    let adapter = adapter_with(&models, LanguageSettings::default(), None);
    let diagnostics = adapter.validate(&uri()).await;

    assert!(diagnostics.len() >= 2, "{diagnostics:?}");
    let warning = &diagnostics[0];
    assert_eq!(warning.severity, DiagnosticSeverity::Warning);
    assert_eq!(warning.code.as_deref(), Some("schema-unavailable"));
    assert_eq!(warning.range, Range::default());
    assert!(diagnostics[1..]
        .iter()
        .any(|d| d.code.as_deref() == Some("syntax-error")));
}

#[tokio::test]
async fn test_schema_warning_codes() {
    let models = open("{ x }");

    let adapter = adapter_with(&models, LanguageSettings::with_url(URL), None);
    let diagnostics = adapter.validate(&uri()).await;
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code.as_deref(), Some("schema-unavailable"));

    let transport = Arc::new(FakeTransport::new());
    transport.fail(URL, TransportError::Http(500, "boom".to_string()));
    let adapter = adapter_with(&models, LanguageSettings::with_url(URL), Some(&transport));
    let diagnostics = adapter.validate(&uri()).await;
    assert_eq!(diagnostics[0].code.as_deref(), Some("schema-fetch-error"));

    let adapter = adapter_with(&models, LanguageSettings::with_sdl("type Query {"), None);
    let diagnostics = adapter.validate(&uri()).await;
    assert_eq!(diagnostics[0].code.as_deref(), Some("schema-parse-error"));
}

// Completion

#[tokio::test]
async fn test_completion_in_open_selection_set() {
    let adapter = minimal_adapter("{ ");
    let items = adapter.complete(&uri(), Position::new(0, 2)).await.unwrap();
    let labels: Vec<&str> = items.iter().map(|item| item.label.as_str()).collect();
    assert!(labels.contains(&"x"), "{labels:?}");
}

#[tokio::test]
async fn test_end_of_document_position_is_valid() {
    let text = "query Q { x }\n";
    let adapter = minimal_adapter(text);
    let end = whole(text).end;

    assert!(adapter.complete(&uri(), end).await.is_ok());
    assert!(adapter.hover(&uri(), end).await.is_none());
    assert!(adapter
        .complete(&uri(), Position::new(40, 40))
        .await
        .is_ok());
}

#[tokio::test]
async fn test_completion_degrades_without_schema() {
    let adapter = adapter_with(&open(""), LanguageSettings::default(), None);
    let items = adapter.complete(&uri(), Position::new(0, 0)).await.unwrap();
    assert!(items.iter().any(|item| item.label == "query"));
    assert!(items.iter().all(|item| item.kind == CompletionItemKind::Keyword));
}

#[tokio::test]
async fn test_resolve_returns_superset() {
    let (text, position) = extract_cursor("{ viewer { * } }");
    let adapter = adapter_with(&open(&text), LanguageSettings::with_sdl(RICH_SCHEMA), None);

    let items = adapter.complete(&uri(), position).await.unwrap();
    assert!(!items.is_empty());

    for item in items {
        let resolved = adapter.resolve_completion_item(item.clone());
        assert_eq!(resolved.label, item.label);
        assert_eq!(resolved.kind, item.kind);
        assert_eq!(resolved.sort_text, item.sort_text);
        assert_eq!(resolved.insert_text, item.insert_text);
        assert_eq!(resolved.data, item.data);
        assert_eq!(resolved.deprecated, item.deprecated);
        if item.detail.is_some() {
            assert_eq!(resolved.detail, item.detail);
        }
        if item.documentation.is_some() {
            assert_eq!(resolved.documentation, item.documentation);
        }

        let again = adapter.resolve_completion_item(resolved.clone());
        assert_eq!(again, resolved);
    }
}

#[tokio::test]
async fn test_resolve_adds_documentation_from_cached_schema() {
    let (text, position) = extract_cursor("{ viewer { * } }");
    let adapter = adapter_with(&open(&text), LanguageSettings::with_sdl(RICH_SCHEMA), None);
    let items = adapter.complete(&uri(), position).await.unwrap();

    let mut email = items.into_iter().find(|item| item.label == "email").unwrap();
    email.documentation = None;
    let resolved = adapter.resolve_completion_item(email);
    assert_eq!(
        resolved.documentation.as_deref(),
        Some("Primary email address")
    );
}

#[tokio::test]
async fn test_resolve_never_fetches() {
    let transport = Arc::new(FakeTransport::new());
    transport.serve(URL, MINIMAL_SCHEMA);
    let adapter = adapter_with(&open("{ x }"), LanguageSettings::with_url(URL), Some(&transport));

    let item = CompletionItem::new("x", CompletionItemKind::Field).with_data(
        graphql_ide::CompletionData::Field {
            parent: "Query".to_string(),
            name: "x".to_string(),
            scope: ScopeKey::default_scope().as_str().to_string(),
        },
    );
    let resolved = adapter.resolve_completion_item(item.clone());
    assert_eq!(resolved, item);
    assert_eq!(transport.fetch_count(), 0);
}

// Hover, symbols, formatting

#[tokio::test]
async fn test_hover_field() {
    let (text, position) = extract_cursor("{ vie*wer { id } }");
    let adapter = adapter_with(&open(&text), LanguageSettings::with_sdl(RICH_SCHEMA), None);
    let hover = adapter.hover(&uri(), position).await.unwrap();
    assert!(hover.contents.contains("`Query.viewer`"));
    assert_eq!(hover.range.unwrap().start, Position::new(0, 2));
}

#[tokio::test]
async fn test_document_symbols() {
    let adapter = minimal_adapter("query Q { x }\nfragment F on Query { x }");
    let symbols = adapter.document_symbols(&uri());
    let names: Vec<(&str, SymbolKind)> = symbols.iter().map(|s| (s.name.as_str(), s.kind)).collect();
    assert_eq!(
        names,
        vec![
            ("Q", SymbolKind::Query),
            ("x", SymbolKind::Field),
            ("F", SymbolKind::Fragment),
            ("x", SymbolKind::Field),
        ]
    );
    assert!(symbols.iter().all(|s| s.location.uri == uri()));
}

#[tokio::test]
async fn test_format_uses_configured_options_by_default() {
    let text = "query Q{x}";
    let mut settings = LanguageSettings::with_sdl(MINIMAL_SCHEMA);
    settings.formatting_options = FormattingOptions {
        tab_size: 4,
        insert_spaces: false,
    };
    let adapter = adapter_with(&open(text), settings, None);

    let edits = adapter.format(&uri(), whole(text), None);
    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].new_text, "query Q {\n\tx\n}");

    let edits = adapter.format(&uri(), whole(text), Some(FormattingOptions::default()));
    assert_eq!(edits[0].new_text, "query Q {\n  x\n}");
}

#[tokio::test]
async fn test_format_accepts_reversed_range() {
    let text = "query Q{x}";
    let adapter = minimal_adapter(text);
    let range = whole(text);
    let reversed = Range::new(range.end, range.start);
    assert_eq!(adapter.format(&uri(), reversed, None).len(), 1);
}

// Schema reload and reconfiguration

#[tokio::test]
async fn test_reload_failure_keeps_previous_schema() {
    let transport = Arc::new(FakeTransport::new());
    transport.serve(URL, MINIMAL_SCHEMA);
    let adapter = adapter_with(&open("{ x }"), LanguageSettings::with_url(URL), Some(&transport));

    assert!(adapter.validate(&uri()).await.is_empty());
    let before = adapter
        .schema_cache()
        .peek(&ScopeKey::default_scope())
        .unwrap();

    transport.fail(URL, TransportError::Http(500, "Internal Server Error".to_string()));
    assert!(!adapter.reload_schema(&uri()).await);

    let after = adapter
        .schema_cache()
        .peek(&ScopeKey::default_scope())
        .unwrap();
    assert!(Arc::ptr_eq(&before, &after));
    assert!(adapter.validate(&uri()).await.is_empty());
    assert_eq!(transport.fetch_count(), 2);
}

#[tokio::test]
async fn test_reload_twice_is_idempotent() {
    let transport = Arc::new(FakeTransport::new());
    transport.serve(URL, MINIMAL_SCHEMA);
    let adapter = adapter_with(&open("{ y }"), LanguageSettings::with_url(URL), Some(&transport));

    assert!(adapter.reload_schema(&uri()).await);
    let first = adapter.validate(&uri()).await;
    assert!(adapter.reload_schema(&uri()).await);
    let second = adapter.validate(&uri()).await;

    assert_eq!(first, second);
    assert_eq!(transport.fetch_count(), 2);
}

#[tokio::test]
async fn test_reload_without_schema_is_false() {
    let adapter = adapter_with(&open("{ x }"), LanguageSettings::default(), None);
    assert!(!adapter.reload_schema(&uri()).await);
    assert!(!adapter.reload_schema(&uri()).await);
}

#[tokio::test]
async fn test_reconfigure_evicts_changed_scope() {
    let adapter = minimal_adapter("{ x }");
    assert!(adapter.validate(&uri()).await.is_empty());

    let evicted = adapter.reconfigure(LanguageSettings::with_sdl("type Query { y: Int }"));
    assert_eq!(evicted, vec![ScopeKey::default_scope()]);
    assert_eq!(adapter.validate(&uri()).await.len(), 1);

    let evicted = adapter.reconfigure((*adapter.settings()).clone());
    assert!(evicted.is_empty());
}

// Panic containment

struct PanickingEngine;

impl AnalysisEngine for PanickingEngine {
    fn diagnostics(
        &self,
        _document: &Document,
        _schema: Option<&SchemaEntry>,
        _rules: &graphql_config::ValidationRules,
    ) -> Vec<Diagnostic> {
        panic!("diagnostics exploded")
    }

    fn completions(
        &self,
        _document: &Document,
        _position: Position,
        _schema: Option<&SchemaEntry>,
    ) -> Vec<CompletionItem> {
        panic!("completions exploded")
    }

    fn resolve_completion(&self, _item: CompletionItem, _schema: Option<&SchemaEntry>) -> CompletionItem {
        panic!("resolve exploded")
    }

    fn hover(&self, _document: &Document, _position: Position, _schema: Option<&SchemaEntry>) -> Option<Hover> {
        panic!("hover exploded")
    }

    fn document_symbols(&self, _document: &Document) -> Vec<SymbolInformation> {
        panic!("symbols exploded")
    }

    fn format(&self, _document: &Document, _range: Range, _options: &FormattingOptions) -> Vec<TextEdit> {
        panic!("format exploded")
    }
}

#[tokio::test]
async fn test_engine_panics_are_contained() {
    let adapter = minimal_adapter("{ x }").with_engine(Arc::new(PanickingEngine));

    assert!(adapter.validate(&uri()).await.is_empty());
    assert_eq!(
        adapter.complete(&uri(), Position::new(0, 2)).await,
        Err(AdapterError::Analysis("completions exploded".to_string()))
    );
    assert!(adapter.hover(&uri(), Position::new(0, 2)).await.is_none());
    assert!(adapter.document_symbols(&uri()).is_empty());
    assert!(adapter.format(&uri(), Range::default(), None).is_empty());

    let item = CompletionItem::new("x", CompletionItemKind::Field);
    assert_eq!(adapter.resolve_completion_item(item.clone()), item);

    // The adapter stays usable after a panic
    assert!(adapter.reload_schema(&uri()).await);
}
