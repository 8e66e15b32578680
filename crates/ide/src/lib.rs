//! # graphql-ide
//!
//! This crate provides editor-facing language features for GraphQL documents.
//! It serves as the API boundary between parsing/validation and the worker
//! adapter.
//!
//! ## Core Principle: POD Types with Public Fields
//!
//! - All output types are Plain Old Data structs with public fields
//! - Types use editor coordinates (URIs, line/UTF-16 column positions)
//! - Byte offsets never leave this crate
//!
//! ## Architecture
//!
//! ```text
//! graphql-worker ← WorkerAdapter, host protocol
//!     ↓
//! graphql-ide (this crate) ← AnalysisEngine, POD types
//!     ↓
//! graphql-syntax ← Parsing, LineIndex
//!     ↓
//! apollo-parser / apollo-compiler
//! ```
//!
//! ## Main Types
//!
//! - [`AnalysisEngine`] - The capability surface the adapter delegates to
//! - [`Analysis`] - The apollo-backed implementation
//! - Feature types: [`CompletionItem`], [`Hover`], [`Diagnostic`],
//!   [`SymbolInformation`]

mod completion;
mod context;
mod diagnostics;
mod format;
mod helpers;
mod hover;
mod resolve;
mod symbols;
mod types;

pub use diagnostics::{DIAGNOSTIC_SOURCE, NO_ANONYMOUS_OPERATIONS, NO_DEPRECATED, SYNTAX_ERROR};
pub use helpers::DEFAULT_DEPRECATION_REASON;
pub use types::{
    CompletionData, CompletionItem, CompletionItemKind, Diagnostic, Hover, Location,
    SymbolInformation, SymbolKind,
};

use graphql_config::{FormattingOptions, ValidationRules};
use graphql_schema_cache::SchemaEntry;
use graphql_types::{Document, Position, Range, TextEdit};

/// Language features over one document snapshot and an optional schema.
///
/// Implementations are pure: they never fetch, never mutate the document and
/// never touch the schema cache. The schema is passed in already resolved
/// (`None` when the document's scope has no usable schema).
pub trait AnalysisEngine: Send + Sync {
    /// Syntax errors, validation errors and enabled lint warnings.
    fn diagnostics(
        &self,
        document: &Document,
        schema: Option<&SchemaEntry>,
        rules: &ValidationRules,
    ) -> Vec<Diagnostic>;

    /// Completion items at `position`, ranked by sort text.
    fn completions(
        &self,
        document: &Document,
        position: Position,
        schema: Option<&SchemaEntry>,
    ) -> Vec<CompletionItem>;

    /// Fill in the details of a completion item. Returns a superset of the
    /// input's fields.
    fn resolve_completion(&self, item: CompletionItem, schema: Option<&SchemaEntry>) -> CompletionItem;

    /// Hover information for the name at `position`.
    fn hover(&self, document: &Document, position: Position, schema: Option<&SchemaEntry>) -> Option<Hover>;

    /// Flat outline of the document.
    fn document_symbols(&self, document: &Document) -> Vec<SymbolInformation>;

    /// Edits formatting the definitions that intersect `range`.
    fn format(&self, document: &Document, range: Range, options: &FormattingOptions) -> Vec<TextEdit>;
}

/// The default engine, built on apollo-parser and apollo-compiler.
#[derive(Debug, Clone, Copy, Default)]
pub struct Analysis;

impl Analysis {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl AnalysisEngine for Analysis {
    fn diagnostics(
        &self,
        document: &Document,
        schema: Option<&SchemaEntry>,
        rules: &ValidationRules,
    ) -> Vec<Diagnostic> {
        diagnostics::diagnostics(document, schema, rules)
    }

    fn completions(
        &self,
        document: &Document,
        position: Position,
        schema: Option<&SchemaEntry>,
    ) -> Vec<CompletionItem> {
        completion::completions(document, position, schema)
    }

    fn resolve_completion(&self, item: CompletionItem, schema: Option<&SchemaEntry>) -> CompletionItem {
        resolve::resolve_completion(item, schema)
    }

    fn hover(&self, document: &Document, position: Position, schema: Option<&SchemaEntry>) -> Option<Hover> {
        hover::hover(document, position, schema)
    }

    fn document_symbols(&self, document: &Document) -> Vec<SymbolInformation> {
        symbols::document_symbols(document)
    }

    fn format(&self, document: &Document, range: Range, options: &FormattingOptions) -> Vec<TextEdit> {
        format::format(document, range, options)
    }
}
