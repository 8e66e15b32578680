//! POD types for editor features.
//!
//! Plain structs with public fields that serve as the interface between the
//! analysis layer and the worker adapter. Everything serialises to the
//! camelCase JSON shape editors expect.

use graphql_types::{DiagnosticSeverity, DocumentUri, Range};
use serde::{Deserialize, Serialize};

/// Diagnostic (error, warning, hint)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub range: Range,
    pub severity: DiagnosticSeverity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub source: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        range: Range,
        severity: DiagnosticSeverity,
        message: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            range,
            severity,
            code: None,
            source: source.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Completion item kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompletionItemKind {
    Field,
    Type,
    Fragment,
    Directive,
    EnumValue,
    Argument,
    Variable,
    Keyword,
}

/// What a completion item refers to, so it can be resolved later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CompletionData {
    Field {
        parent: String,
        name: String,
        scope: String,
    },
    Type {
        name: String,
        scope: String,
    },
    Directive {
        name: String,
        scope: String,
    },
}

impl CompletionData {
    /// Schema scope the item was produced against.
    #[must_use]
    pub fn scope(&self) -> &str {
        match self {
            Self::Field { scope, .. } | Self::Type { scope, .. } | Self::Directive { scope, .. } => {
                scope
            }
        }
    }
}

/// Completion item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionItem {
    pub label: String,
    pub kind: CompletionItemKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insert_text: Option<String>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<CompletionData>,
}

impl CompletionItem {
    pub fn new(label: impl Into<String>, kind: CompletionItemKind) -> Self {
        Self {
            label: label.into(),
            kind,
            detail: None,
            documentation: None,
            sort_text: None,
            insert_text: None,
            deprecated: false,
            data: None,
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    #[must_use]
    pub fn with_documentation(mut self, doc: impl Into<String>) -> Self {
        self.documentation = Some(doc.into());
        self
    }

    #[must_use]
    pub fn with_insert_text(mut self, text: impl Into<String>) -> Self {
        self.insert_text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_sort_text(mut self, sort_text: impl Into<String>) -> Self {
        self.sort_text = Some(sort_text.into());
        self
    }

    #[must_use]
    pub const fn with_deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }

    #[must_use]
    pub fn with_data(mut self, data: CompletionData) -> Self {
        self.data = Some(data);
        self
    }

    /// Key used to rank items: `sort_text`, else the label.
    #[must_use]
    pub fn sort_key(&self) -> &str {
        self.sort_text.as_deref().unwrap_or(&self.label)
    }
}

/// Hover information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hover {
    /// Markdown content
    pub contents: String,
    /// Range of the hovered name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,
}

impl Hover {
    pub fn new(contents: impl Into<String>) -> Self {
        Self {
            contents: contents.into(),
            range: None,
        }
    }

    #[must_use]
    pub const fn with_range(mut self, range: Range) -> Self {
        self.range = Some(range);
        self
    }
}

/// Kind of GraphQL symbol for the document outline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SymbolKind {
    /// Query operation
    Query,
    /// Mutation operation
    Mutation,
    /// Subscription operation
    Subscription,
    /// Fragment definition
    Fragment,
    /// Field selection or field definition
    Field,
    /// Object type definition
    Type,
    /// Interface type
    Interface,
    /// Input type
    Input,
    /// Enum type
    Enum,
    /// Enum value
    EnumValue,
    /// Union type
    Union,
    /// Scalar type
    Scalar,
    /// Directive definition
    Directive,
}

impl SymbolKind {
    /// The closest LSP `SymbolKind` number, for hosts that render LSP kinds.
    #[must_use]
    pub const fn lsp_code(self) -> u8 {
        match self {
            Self::Query | Self::Mutation | Self::Subscription => 12,
            Self::Fragment => 5,
            Self::Field => 8,
            Self::Type | Self::Input => 23,
            Self::Interface => 11,
            Self::Enum | Self::Union => 10,
            Self::EnumValue => 22,
            Self::Scalar => 26,
            Self::Directive => 24,
        }
    }
}

/// Location in a specific document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub uri: DocumentUri,
    pub range: Range,
}

impl Location {
    #[must_use]
    pub const fn new(uri: DocumentUri, range: Range) -> Self {
        Self { uri, range }
    }
}

/// A flat outline entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolInformation {
    pub name: String,
    pub kind: SymbolKind,
    pub location: Location,
    /// Owning definition, for nested symbols
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_name: Option<String>,
}

impl SymbolInformation {
    pub fn new(name: impl Into<String>, kind: SymbolKind, location: Location) -> Self {
        Self {
            name: name.into(),
            kind,
            location,
            container_name: None,
        }
    }

    #[must_use]
    pub fn with_container(mut self, container: impl Into<String>) -> Self {
        self.container_name = Some(container.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphql_types::Position;

    #[test]
    fn test_completion_item_builder() {
        let item = CompletionItem::new("fieldName", CompletionItemKind::Field)
            .with_detail("String!")
            .with_documentation("A field that returns a string")
            .with_deprecated(true);

        assert_eq!(item.label, "fieldName");
        assert_eq!(item.kind, CompletionItemKind::Field);
        assert_eq!(item.detail, Some("String!".to_string()));
        assert!(item.deprecated);
        assert_eq!(item.sort_key(), "fieldName");
    }

    #[test]
    fn test_completion_item_json_shape() {
        let item = CompletionItem::new("user", CompletionItemKind::Field)
            .with_sort_text("0user")
            .with_data(CompletionData::Field {
                parent: "Query".into(),
                name: "user".into(),
                scope: "default".into(),
            });
        let value = serde_json::to_value(&item).unwrap();

        assert_eq!(value["kind"], "field");
        assert_eq!(value["sortText"], "0user");
        assert_eq!(value["data"]["kind"], "field");
        assert_eq!(value["data"]["parent"], "Query");
        assert!(value.get("documentation").is_none());

        let back: CompletionItem = serde_json::from_value(value).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_diagnostic_builder() {
        let diag = Diagnostic::new(
            Range::new(Position::new(1, 0), Position::new(1, 10)),
            DiagnosticSeverity::Error,
            "Unknown type: User",
            "graphql",
        )
        .with_code("unknown-type");

        assert_eq!(diag.severity, DiagnosticSeverity::Error);
        assert_eq!(diag.code.as_deref(), Some("unknown-type"));

        let value = serde_json::to_value(&diag).unwrap();
        assert_eq!(value["severity"], 1);
    }

    #[test]
    fn test_hover_builder() {
        let hover = Hover::new("```graphql\ntype User\n```")
            .with_range(Range::new(Position::new(0, 5), Position::new(0, 9)));

        assert!(hover.contents.contains("type User"));
        assert!(hover.range.is_some());
    }

    #[test]
    fn test_symbol_information_json_shape() {
        let symbol = SymbolInformation::new(
            "id",
            SymbolKind::Field,
            Location::new(DocumentUri::new("file:///a.graphql"), Range::default()),
        )
        .with_container("GetUser");
        let value = serde_json::to_value(&symbol).unwrap();

        assert_eq!(value["containerName"], "GetUser");
        assert_eq!(value["location"]["uri"], "file:///a.graphql");
        assert_eq!(SymbolKind::Field.lsp_code(), 8);
    }
}
