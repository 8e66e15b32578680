//! # GraphQL Syntax Parsing
//!
//! This crate is the boundary between raw editor text and the GraphQL
//! grammar engine:
//!
//! - [`parse`] runs `apollo-parser` and returns an error-tolerant CST plus
//!   syntax errors as byte ranges.
//! - [`LineIndex`] translates between byte offsets (the only internal
//!   coordinate system) and editor [`Position`](graphql_types::Position)s
//!   counted in UTF-16 code units.
//! - [`repair`] holds lexical helpers used when the document is being typed
//!   and the tree is incomplete.

mod line_index;
pub mod repair;

pub use line_index::LineIndex;

use graphql_types::OffsetRange;
use std::sync::Arc;

/// A syntax error with its byte range in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Error message
    pub message: String,
    /// Byte range of the offending token (zero-width at end of input)
    pub range: OffsetRange,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (at offset {})", self.message, self.range.start)
    }
}

/// Result of parsing a document.
#[derive(Debug)]
pub struct Parse {
    /// The parsed syntax tree (CST, keeps every token and its position)
    pub tree: Arc<apollo_parser::SyntaxTree>,
    /// Syntax errors reported by the parser
    pub errors: Vec<ParseError>,
}

impl Parse {
    /// Returns `true` if the parser reported syntax errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Parse GraphQL source into a CST.
///
/// Never fails: incomplete input still yields a tree, with the problems
/// recorded in [`Parse::errors`].
#[must_use]
pub fn parse(text: &str) -> Parse {
    let tree = apollo_parser::Parser::new(text).parse();

    let errors = tree
        .errors()
        .map(|e| {
            let start = e.index().min(text.len());
            let end = (start + e.data().len()).min(text.len());
            ParseError {
                message: e.message().to_string(),
                range: OffsetRange::new(start, end),
            }
        })
        .collect::<Vec<_>>();

    if !errors.is_empty() {
        tracing::debug!(error_count = errors.len(), "Parsed document with syntax errors");
    }

    Parse {
        tree: Arc::new(tree),
        errors,
    }
}

/// Check if GraphQL content contains type-system definitions.
///
/// Returns true if the content contains any schema type definitions, extensions,
/// or directive definitions.
#[must_use]
pub fn content_has_schema_definitions(content: &str) -> bool {
    use apollo_compiler::ast::Definition;

    let ast = apollo_compiler::ast::Document::parse(content, "virtual.graphql")
        .unwrap_or_else(|e| e.partial);

    ast.definitions.iter().any(|def| {
        matches!(
            def,
            Definition::SchemaDefinition(_)
                | Definition::SchemaExtension(_)
                | Definition::ObjectTypeDefinition(_)
                | Definition::ObjectTypeExtension(_)
                | Definition::InterfaceTypeDefinition(_)
                | Definition::InterfaceTypeExtension(_)
                | Definition::UnionTypeDefinition(_)
                | Definition::UnionTypeExtension(_)
                | Definition::ScalarTypeDefinition(_)
                | Definition::ScalarTypeExtension(_)
                | Definition::EnumTypeDefinition(_)
                | Definition::EnumTypeExtension(_)
                | Definition::InputObjectTypeDefinition(_)
                | Definition::InputObjectTypeExtension(_)
                | Definition::DirectiveDefinition(_)
        )
    })
}

/// Check if GraphQL content contains executable definitions (operations or fragments).
#[must_use]
pub fn content_has_executable_definitions(content: &str) -> bool {
    use apollo_compiler::ast::Definition;

    let ast = apollo_compiler::ast::Document::parse(content, "virtual.graphql")
        .unwrap_or_else(|e| e.partial);

    ast.definitions.iter().any(|def| {
        matches!(
            def,
            Definition::OperationDefinition(_) | Definition::FragmentDefinition(_)
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_graphql() {
        let parse = parse("query GetUser { user { id } }");

        assert!(!parse.has_errors());
        assert_eq!(parse.tree.document().definitions().count(), 1);
    }

    #[test]
    fn test_parse_graphql_with_error() {
        let parse = parse("{ ");

        assert!(parse.has_errors());
        for error in &parse.errors {
            assert!(error.range.end <= 2, "error range out of bounds: {error}");
        }
    }

    #[test]
    fn test_parse_empty_document() {
        let parse = parse("");
        assert_eq!(parse.tree.document().definitions().count(), 0);
    }

    #[test]
    fn test_content_has_schema_definitions() {
        assert!(content_has_schema_definitions("type Query { x: String }"));
        assert!(content_has_schema_definitions("directive @cached on FIELD"));
        assert!(!content_has_schema_definitions("query { x }"));
    }

    #[test]
    fn test_content_has_executable_definitions() {
        assert!(content_has_executable_definitions("{ x }"));
        assert!(content_has_executable_definitions(
            "fragment F on Query { x }"
        ));
        assert!(!content_has_executable_definitions("type Query { x: String }"));
    }
}
