//! Diagnostics: syntax errors, apollo-compiler validation and lint rules.

use crate::helpers::{
    cst_operation_type, deprecation_reason, field_definition, name_text, named_type_text,
    node_offset_range, operation_keyword, root_type_name,
};
use crate::types::Diagnostic;
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::validation::DiagnosticList;
use apollo_compiler::{ExecutableDocument, Schema};
use apollo_parser::cst;
use graphql_config::{ValidationRule, ValidationRules};
use graphql_schema_cache::SchemaEntry;
use graphql_syntax::LineIndex;
use graphql_types::{DiagnosticSeverity, Document, OffsetRange, Range};

/// `source` of every diagnostic produced here.
pub const DIAGNOSTIC_SOURCE: &str = "graphql";

pub const SYNTAX_ERROR: &str = "syntax-error";
pub const NO_DEPRECATED: &str = "no-deprecated";
pub const NO_ANONYMOUS_OPERATIONS: &str = "no-anonymous-operations";

/// Diagnostics for one document.
///
/// Syntax errors short-circuit everything else. Documents holding only
/// type-system definitions are validated as a schema; everything else is
/// validated as an executable document against `schema` when there is one.
pub(crate) fn diagnostics(
    document: &Document,
    schema: Option<&SchemaEntry>,
    rules: &ValidationRules,
) -> Vec<Diagnostic> {
    let text = document.text();
    let line_index = LineIndex::new(text);
    let parse = graphql_syntax::parse(text);

    if parse.has_errors() {
        return parse
            .errors
            .iter()
            .map(|error| {
                Diagnostic::new(
                    line_index.range(error.range),
                    DiagnosticSeverity::Error,
                    error.message.clone(),
                    DIAGNOSTIC_SOURCE,
                )
                .with_code(SYNTAX_ERROR)
            })
            .collect();
    }

    let path = document.uri.path();
    let mut diagnostics = Vec::new();

    if graphql_syntax::content_has_schema_definitions(text)
        && !graphql_syntax::content_has_executable_definitions(text)
    {
        if rules.contains(ValidationRule::Spec) {
            if let Err(with_errors) = Schema::parse_and_validate(text, path) {
                push_apollo_errors(&mut diagnostics, &with_errors.errors, &line_index);
            }
        }
        return diagnostics;
    }

    if rules.contains(ValidationRule::NoAnonymousOperations) {
        no_anonymous_operations(&parse.tree, &line_index, &mut diagnostics);
    }

    let Some(entry) = schema else {
        tracing::debug!(uri = %document.uri, "No schema, skipping validation");
        return diagnostics;
    };

    if rules.contains(ValidationRule::Spec) {
        if let Err(with_errors) = ExecutableDocument::parse_and_validate(entry.schema(), text, path)
        {
            push_apollo_errors(&mut diagnostics, &with_errors.errors, &line_index);
        }
    }

    if rules.contains(ValidationRule::NoDeprecated) {
        let mut lint = DeprecationLint {
            schema: entry.schema(),
            line_index: &line_index,
            diagnostics: &mut diagnostics,
        };
        lint.check_document(&parse.tree);
    }

    diagnostics.sort_by_key(|diag| (diag.range.start, diag.range.end));
    diagnostics
}

fn push_apollo_errors(diagnostics: &mut Vec<Diagnostic>, errors: &DiagnosticList, line_index: &LineIndex) {
    use apollo_compiler::diagnostic::ToCliReport;

    for apollo_diag in errors.iter() {
        let message = apollo_diag.error.to_string();
        // A buffer often holds fragments used elsewhere
        if message.contains("must be used in an operation") {
            continue;
        }
        let range = apollo_diag.error.location().map_or_else(Range::default, |span| {
            line_index.range(OffsetRange::new(span.offset(), span.end_offset()))
        });
        diagnostics.push(Diagnostic::new(
            range,
            DiagnosticSeverity::Error,
            message,
            DIAGNOSTIC_SOURCE,
        ));
    }
}

fn no_anonymous_operations(
    tree: &apollo_parser::SyntaxTree,
    line_index: &LineIndex,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for definition in tree.document().definitions() {
        let cst::Definition::OperationDefinition(op) = definition else {
            continue;
        };
        if op.name().is_some() {
            continue;
        }
        // Highlight the keyword, or the opening brace of shorthand queries
        let range = op.operation_type().map_or_else(
            || {
                let start = node_offset_range(&op).start;
                OffsetRange::new(start, start + 1)
            },
            |op_type| node_offset_range(&op_type),
        );
        let kind = operation_keyword(cst_operation_type(&op));
        diagnostics.push(
            Diagnostic::new(
                line_index.range(range),
                DiagnosticSeverity::Warning,
                format!("Anonymous {kind} operation. Give it a name to make it easier to identify."),
                DIAGNOSTIC_SOURCE,
            )
            .with_code(NO_ANONYMOUS_OPERATIONS),
        );
    }
}

/// Warns on every use of a deprecated field or enum value.
struct DeprecationLint<'a> {
    schema: &'a Schema,
    line_index: &'a LineIndex,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl DeprecationLint<'_> {
    fn check_document(&mut self, tree: &apollo_parser::SyntaxTree) {
        for definition in tree.document().definitions() {
            match definition {
                cst::Definition::OperationDefinition(op) => {
                    let root = root_type_name(self.schema, cst_operation_type(&op));
                    if let (Some(root), Some(selection_set)) = (root, op.selection_set()) {
                        self.check_selection_set(&selection_set, root);
                    }
                }
                cst::Definition::FragmentDefinition(frag) => {
                    let type_condition = frag
                        .type_condition()
                        .and_then(|tc| tc.named_type())
                        .and_then(|named| named_type_text(&named));
                    if let (Some(ty), Some(selection_set)) = (type_condition, frag.selection_set()) {
                        self.check_selection_set(&selection_set, &ty);
                    }
                }
                _ => {}
            }
        }
    }

    fn check_selection_set(&mut self, selection_set: &cst::SelectionSet, parent: &str) {
        for selection in selection_set.selections() {
            match selection {
                cst::Selection::Field(field) => self.check_field(&field, parent),
                cst::Selection::InlineFragment(inline_frag) => {
                    let ty = inline_frag
                        .type_condition()
                        .and_then(|tc| tc.named_type())
                        .and_then(|named| named_type_text(&named))
                        .unwrap_or_else(|| parent.to_string());
                    if let Some(nested) = inline_frag.selection_set() {
                        self.check_selection_set(&nested, &ty);
                    }
                }
                cst::Selection::FragmentSpread(_) => {}
            }
        }
    }

    fn check_field(&mut self, field: &cst::Field, parent: &str) {
        let Some(name) = field.name() else {
            return;
        };
        let field_name = name_text(&name);
        let Some(definition) = field_definition(self.schema, parent, &field_name) else {
            return;
        };

        if let Some(reason) = deprecation_reason(&definition.directives) {
            self.warn(
                node_offset_range(&name),
                format!("The field {parent}.{field_name} is deprecated. {reason}"),
            );
        }

        if let Some(arguments) = field.arguments() {
            for argument in arguments.arguments() {
                let (Some(arg_name), Some(value)) = (argument.name(), argument.value()) else {
                    continue;
                };
                let arg_name = name_text(&arg_name);
                if let Some(arg_def) = definition
                    .arguments
                    .iter()
                    .find(|arg| arg.name == arg_name.as_str())
                {
                    self.check_value(&value, arg_def.ty.inner_named_type());
                }
            }
        }

        if let Some(nested) = field.selection_set() {
            let field_type = definition.ty.inner_named_type().to_string();
            self.check_selection_set(&nested, &field_type);
        }
    }

    fn check_value(&mut self, value: &cst::Value, type_name: &str) {
        match (value, self.schema.types.get(type_name)) {
            (cst::Value::EnumValue(enum_value), Some(ExtendedType::Enum(enum_type))) => {
                let Some(name) = enum_value.name() else {
                    return;
                };
                let value_name = name_text(&name);
                let reason = enum_type
                    .values
                    .get(value_name.as_str())
                    .and_then(|def| deprecation_reason(&def.directives));
                if let Some(reason) = reason {
                    self.warn(
                        node_offset_range(enum_value),
                        format!("The enum value {type_name}.{value_name} is deprecated. {reason}"),
                    );
                }
            }
            (cst::Value::ListValue(list), _) => {
                for item in list.values() {
                    self.check_value(&item, type_name);
                }
            }
            (cst::Value::ObjectValue(object), Some(ExtendedType::InputObject(input))) => {
                for object_field in object.object_fields() {
                    let (Some(name), Some(field_value)) = (object_field.name(), object_field.value())
                    else {
                        continue;
                    };
                    if let Some(field_def) = input.fields.get(name_text(&name).as_str()) {
                        self.check_value(&field_value, field_def.ty.inner_named_type());
                    }
                }
            }
            _ => {}
        }
    }

    fn warn(&mut self, range: OffsetRange, message: String) {
        self.diagnostics.push(
            Diagnostic::new(
                self.line_index.range(range),
                DiagnosticSeverity::Warning,
                message,
                DIAGNOSTIC_SOURCE,
            )
            .with_code(NO_DEPRECATED),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphql_test_utils::fixtures::{MINIMAL_SCHEMA, RICH_SCHEMA};
    use graphql_types::Position;

    fn document(text: &str) -> Document {
        Document::new("file:///query.graphql", "graphql", 1, text)
    }

    fn check(text: &str, sdl: &str, rules: &[ValidationRule]) -> Vec<Diagnostic> {
        let entry = SchemaEntry::inline(sdl).unwrap();
        diagnostics(&document(text), Some(&entry), &ValidationRules::new(rules.iter().copied()))
    }

    #[test]
    fn test_valid_query_has_no_diagnostics() {
        assert!(check("{ x }", MINIMAL_SCHEMA, &[ValidationRule::Spec]).is_empty());
    }

    #[test]
    fn test_unknown_field_is_located_at_the_field() {
        let diagnostics = check("{ y }", MINIMAL_SCHEMA, &[ValidationRule::Spec]);
        assert_eq!(diagnostics.len(), 1, "{diagnostics:?}");
        let diag = &diagnostics[0];
        assert!(diag.message.contains('y'), "{}", diag.message);
        assert_eq!(diag.severity, DiagnosticSeverity::Error);
        assert_eq!(diag.range.start, Position::new(0, 2));
        assert_eq!(diag.source, DIAGNOSTIC_SOURCE);
    }

    #[test]
    fn test_syntax_errors_short_circuit() {
        let diagnostics = check("{ x", MINIMAL_SCHEMA, &[ValidationRule::Spec]);
        assert!(!diagnostics.is_empty());
        assert!(diagnostics
            .iter()
            .all(|diag| diag.code.as_deref() == Some(SYNTAX_ERROR)));
    }

    #[test]
    fn test_syntax_errors_without_schema() {
        let diagnostics = diagnostics(&document("query {"), None, &ValidationRules::default());
        assert!(!diagnostics.is_empty());
        assert_eq!(diagnostics[0].code.as_deref(), Some(SYNTAX_ERROR));
    }

    #[test]
    fn test_no_schema_skips_validation() {
        let diagnostics = diagnostics(&document("{ y }"), None, &ValidationRules::default());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_unused_fragment_is_not_reported() {
        let diagnostics = check(
            "fragment F on Query { x }",
            MINIMAL_SCHEMA,
            &[ValidationRule::Spec],
        );
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
    }

    #[test]
    fn test_spec_rule_disabled() {
        assert!(check("{ y }", MINIMAL_SCHEMA, &[]).is_empty());
    }

    #[test]
    fn test_sdl_document_is_validated_as_schema() {
        let diagnostics = diagnostics(
            &document("type Query { a: Missing }"),
            None,
            &ValidationRules::default(),
        );
        assert_eq!(diagnostics.len(), 1, "{diagnostics:?}");
        assert!(diagnostics[0].message.contains("Missing"));
    }

    #[test]
    fn test_no_deprecated_fields_and_enum_values() {
        let text = "query Q { me { id } search(term: \"a\", kind: LEGACY) { __typename } }";
        let diagnostics = check(text, RICH_SCHEMA, &[ValidationRule::NoDeprecated]);
        assert_eq!(diagnostics.len(), 2, "{diagnostics:?}");
        assert!(diagnostics
            .iter()
            .all(|diag| diag.code.as_deref() == Some(NO_DEPRECATED)));
        assert!(diagnostics[0].message.contains("Query.me"));
        assert!(diagnostics[0].message.contains("Use `viewer`"));
        assert_eq!(diagnostics[0].range.start, Position::new(0, 10));
        assert!(diagnostics[1].message.contains("SearchKind.LEGACY"));
        assert_eq!(diagnostics[1].severity, DiagnosticSeverity::Warning);
    }

    #[test]
    fn test_no_deprecated_inside_fragments() {
        let text = "fragment F on User { legacyId }";
        let diagnostics = check(text, RICH_SCHEMA, &[ValidationRule::NoDeprecated]);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("No longer supported"));
    }

    #[test]
    fn test_no_anonymous_operations() {
        let text = "{ x }\nquery Named { x }\nquery { x }";
        let diagnostics = check(text, MINIMAL_SCHEMA, &[ValidationRule::NoAnonymousOperations]);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].range.start, Position::new(0, 0));
        assert_eq!(diagnostics[1].range.start, Position::new(2, 0));
        assert_eq!(diagnostics[1].range.end, Position::new(2, 5));
        assert_eq!(diagnostics[1].code.as_deref(), Some(NO_ANONYMOUS_OPERATIONS));
    }

    #[test]
    fn test_utf16_ranges() {
        let text = "# héllo 🚀\n{ y }";
        let diagnostics = check(text, MINIMAL_SCHEMA, &[ValidationRule::Spec]);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].range.start, Position::new(1, 2));
    }
}
