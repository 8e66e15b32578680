//! Range formatting.
//!
//! Each top-level definition that intersects the requested range is
//! reprinted with apollo-compiler's serializer. The serializer does not keep
//! comments, so definitions containing any are left as written.

use graphql_config::FormattingOptions;
use graphql_syntax::repair::has_comments;
use graphql_syntax::LineIndex;
use graphql_types::{Document, OffsetRange, Range, TextEdit};

use crate::helpers::node_offset_range;

/// Edits that format the definitions touched by `range`.
///
/// Returns no edits for documents with syntax errors and for definitions
/// that are already formatted.
pub(crate) fn format(document: &Document, range: Range, options: &FormattingOptions) -> Vec<TextEdit> {
    let text = document.text();
    let parse = graphql_syntax::parse(text);
    if parse.has_errors() {
        tracing::debug!(uri = %document.uri, "Not formatting a document with syntax errors");
        return Vec::new();
    }

    let line_index = LineIndex::new(text);
    let requested = line_index.offset_range(range);
    let indent = options.indent();

    let mut edits = Vec::new();
    for definition in parse.tree.document().definitions() {
        let span = trimmed(text, node_offset_range(&definition));
        if span.start > requested.end || requested.start > span.end {
            continue;
        }

        let source = &text[span.start..span.end];
        if has_comments(source) {
            tracing::debug!(%span, "Skipping definition with comments");
            continue;
        }

        let Some(formatted) = format_definition(source, &indent) else {
            continue;
        };
        if formatted != source {
            edits.push(TextEdit::new(line_index.range(span), formatted));
        }
    }

    edits
}

/// Reprint a single definition. `None` if it does not parse on its own.
fn format_definition(source: &str, indent: &str) -> Option<String> {
    let document = apollo_compiler::ast::Document::parse(source, "format.graphql").ok()?;
    let printed = document.serialize().indent_prefix(indent).to_string();
    Some(printed.trim_end().to_string())
}

/// Shrink a range to exclude surrounding whitespace.
fn trimmed(text: &str, range: OffsetRange) -> OffsetRange {
    let slice = &text[range.start..range.end];
    let start = range.start + (slice.len() - slice.trim_start().len());
    let end = range.end - (slice.len() - slice.trim_end().len());
    OffsetRange::new(start, end.max(start))
}
