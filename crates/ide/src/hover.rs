//! Hover feature implementation.
//!
//! This module provides IDE hover functionality including:
//! - Field type, arguments, description and deprecation
//! - Type kind and description
//! - Argument and directive signatures
//! - Fragment type condition and variable types

use std::fmt::Write as _;

use apollo_compiler::schema::ExtendedType;
use apollo_compiler::Schema;
use graphql_schema_cache::SchemaEntry;
use graphql_syntax::repair::close_unbalanced;
use graphql_syntax::LineIndex;
use graphql_types::{Document, Position};

use crate::context::{
    find_symbol_at_offset, fragment_definitions, parent_type_at_offset, variables_in_scope, Symbol,
};
use crate::helpers::{
    cst_operation_type, deprecation_reason, field_definition, field_signature,
    input_value_signature, name_text, operation_keyword,
};
use crate::types::Hover;

/// Get hover information at a position.
///
/// Returns documentation, type information, etc.
pub(crate) fn hover(
    document: &Document,
    position: Position,
    schema: Option<&SchemaEntry>,
) -> Option<Hover> {
    let text = document.text();
    let line_index = LineIndex::new(text);
    let offset = line_index.offset(position);

    let repaired = close_unbalanced(text);
    let tree = apollo_parser::Parser::new(&repaired).parse();
    let symbol = find_symbol_at_offset(&tree, offset);

    if symbol.is_none() && tree.errors().next().is_some() {
        let error_messages: Vec<&str> = tree.errors().map(|e| e.message()).collect();
        return Some(Hover::new(format!(
            "**Syntax Errors**\n\n{}",
            error_messages.join("\n")
        )));
    }

    let found = symbol?;
    let schema = schema.map(|entry| &**entry.schema());
    tracing::debug!(symbol = ?found.symbol, offset, "Hover");

    let contents = match found.symbol {
        Symbol::FieldName { name } => {
            let schema = schema?;
            let parent = parent_type_at_offset(&tree, schema, offset)?;
            field_hover(schema, &parent, &name)?
        }
        Symbol::TypeName { name } => type_hover(schema?, &name)?,
        Symbol::ArgumentName {
            name,
            field,
            directive,
        } => {
            let schema = schema?;
            let arguments = match (directive, field) {
                (Some(directive), _) => &schema.directive_definitions.get(directive.as_str())?.arguments,
                (None, Some(field)) => {
                    let parent = parent_type_at_offset(&tree, schema, offset)?;
                    &field_definition(schema, &parent, &field)?.arguments
                }
                (None, None) => return None,
            };
            let arg = arguments.iter().find(|arg| arg.name == name.as_str())?;

            let mut hover_text = format!("**Argument:** `{}`\n\n", input_value_signature(arg));
            if let Some(desc) = arg.description.as_deref() {
                write!(hover_text, "---\n\n{desc}\n\n").ok();
            }
            hover_text
        }
        Symbol::DirectiveName { name } => {
            let directive = schema?.directive_definitions.get(name.as_str())?;
            let args: Vec<String> = directive
                .arguments
                .iter()
                .map(|arg| input_value_signature(arg))
                .collect();

            let mut hover_text = if args.is_empty() {
                format!("**Directive:** `@{name}`\n\n")
            } else {
                format!("**Directive:** `@{name}({})`\n\n", args.join(", "))
            };
            let locations: Vec<String> = directive
                .locations
                .iter()
                .map(ToString::to_string)
                .collect();
            write!(hover_text, "**Locations:** {}\n\n", locations.join(" | ")).ok();
            if let Some(desc) = directive.description.as_deref() {
                write!(hover_text, "---\n\n{desc}\n\n").ok();
            }
            hover_text
        }
        Symbol::FragmentSpread { name } => {
            let fragment = fragment_definitions(&tree)
                .into_iter()
                .find(|fragment| fragment.name == name)?;
            match fragment.type_condition {
                Some(condition) => {
                    format!("**Fragment:** `{name}`\n\n**On Type:** `{condition}`\n\n")
                }
                None => format!("**Fragment:** `{name}`\n\n"),
            }
        }
        Symbol::VariableReference { name } => {
            let (_, ty) = variables_in_scope(&tree, offset)
                .into_iter()
                .find(|(variable, _)| *variable == name)?;
            format!("**Variable:** `${name}`\n\n**Type:** `{ty}`\n\n")
        }
        Symbol::OperationName { name } => {
            let kind = tree.document().definitions().find_map(|definition| {
                let apollo_parser::cst::Definition::OperationDefinition(op) = definition else {
                    return None;
                };
                let op_name = op.name()?;
                (name_text(&op_name) == name).then(|| cst_operation_type(&op))
            })?;
            format!(
                "**Operation:** `{name}`\n\n**Kind:** {}\n\n",
                operation_keyword(kind)
            )
        }
    };

    Some(Hover::new(contents).with_range(line_index.range(found.range)))
}

fn field_hover(schema: &Schema, parent: &str, name: &str) -> Option<String> {
    let field = field_definition(schema, parent, name)?;

    let mut hover_text = format!("**Field:** `{parent}.{name}`\n\n");
    write!(hover_text, "```graphql\n{}\n```\n\n", field_signature(name, field)).ok();
    write!(hover_text, "**Type:** `{}`\n\n", field.ty).ok();

    if !field.arguments.is_empty() {
        hover_text.push_str("**Arguments:**\n\n");
        for arg in &field.arguments {
            writeln!(hover_text, "- `{}`", input_value_signature(arg)).ok();
        }
        hover_text.push('\n');
    }

    if let Some(desc) = field.description.as_deref() {
        write!(hover_text, "---\n\n{desc}\n\n").ok();
    }

    if let Some(reason) = deprecation_reason(&field.directives) {
        write!(hover_text, "---\n\n**Deprecated:** {reason}\n\n").ok();
    }

    Some(hover_text)
}

fn type_hover(schema: &Schema, name: &str) -> Option<String> {
    let type_def = schema.types.get(name)?;

    let mut hover_text = format!("**Type:** `{name}`\n\n");
    let (kind_str, description) = match type_def {
        ExtendedType::Object(t) => ("Object", t.description.as_deref()),
        ExtendedType::Interface(t) => ("Interface", t.description.as_deref()),
        ExtendedType::Union(t) => ("Union", t.description.as_deref()),
        ExtendedType::Enum(t) => ("Enum", t.description.as_deref()),
        ExtendedType::Scalar(t) => ("Scalar", t.description.as_deref()),
        ExtendedType::InputObject(t) => ("Input Object", t.description.as_deref()),
    };
    write!(hover_text, "**Kind:** {kind_str}\n\n").ok();

    if let Some(desc) = description {
        write!(hover_text, "---\n\n{desc}\n\n").ok();
    }

    Some(hover_text)
}
