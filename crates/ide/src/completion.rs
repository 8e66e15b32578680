//! Completion feature implementation.
//!
//! This module provides IDE auto-completion functionality including:
//! - Field completions in selection sets, with `__typename`
//! - Inline fragment completions for unions and interfaces
//! - Fragment spread completions
//! - Argument names and argument values (enum values, booleans, variables)
//! - Directives valid at the cursor's location
//! - Type names in type conditions and variable definitions
//! - Operation keywords between definitions
//!
//! Completion runs on a copy of the text with unbalanced brackets closed, so
//! an unterminated `{ ` still puts the cursor inside a selection set.

use apollo_compiler::ast::DirectiveLocation;
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::Schema;
use graphql_schema_cache::SchemaEntry;
use graphql_syntax::repair::{close_unbalanced, tokens_before, word_before};
use graphql_syntax::LineIndex;
use graphql_types::{Document, Position};

use crate::context::{
    find_completion_context, fragment_definitions, parent_type_at_offset, variables_in_scope,
    CompletionContext,
};
use crate::helpers::{
    deprecation_reason, field_definition, input_value_signature, is_abstract, is_composite,
    is_input, possible_types, root_type_name, type_keyword,
};
use crate::types::{CompletionData, CompletionItem, CompletionItemKind};

/// Executable definition keywords, with the root type each one needs.
const DEFINITION_KEYWORDS: &[(&str, Option<apollo_compiler::ast::OperationType>)] = &[
    ("query", None),
    (
        "mutation",
        Some(apollo_compiler::ast::OperationType::Mutation),
    ),
    (
        "subscription",
        Some(apollo_compiler::ast::OperationType::Subscription),
    ),
    ("fragment", None),
];

/// Get completions at a position.
///
/// Returns the items matching the partial name before the cursor, ranked by
/// sort text.
pub(crate) fn completions(
    document: &Document,
    position: Position,
    schema: Option<&SchemaEntry>,
) -> Vec<CompletionItem> {
    let text = document.text();
    let line_index = LineIndex::new(text);
    let offset = line_index.offset(position);

    let repaired = close_unbalanced(text);
    let tree = apollo_parser::Parser::new(&repaired).parse();
    let tokens = tokens_before(text, offset);

    let Some(context) = find_completion_context(&repaired, &tree, offset, &tokens) else {
        tracing::debug!(offset, "No completion context");
        return Vec::new();
    };
    tracing::debug!(?context, offset, "Completion context");

    let builder = ItemBuilder { schema };
    let mut items = match context {
        CompletionContext::Field => builder
            .schema_ref()
            .and_then(|schema| parent_type_at_offset(&tree, schema, offset))
            .map(|parent| builder.field_items(&parent))
            .unwrap_or_default(),
        CompletionContext::FragmentSpread => {
            let parent = builder
                .schema_ref()
                .and_then(|schema| parent_type_at_offset(&tree, schema, offset));
            builder.fragment_items(&tree, parent.as_deref())
        }
        CompletionContext::Argument {
            field_name,
            directive_name,
            existing,
        } => {
            let parent = builder
                .schema_ref()
                .and_then(|schema| parent_type_at_offset(&tree, schema, offset));
            builder.argument_items(
                parent.as_deref(),
                field_name.as_deref(),
                directive_name.as_deref(),
                &existing,
            )
        }
        CompletionContext::ArgumentValue {
            field_name,
            directive_name,
            argument,
        } => {
            let parent = builder
                .schema_ref()
                .and_then(|schema| parent_type_at_offset(&tree, schema, offset));
            let mut items = builder.argument_value_items(
                parent.as_deref(),
                field_name.as_deref(),
                directive_name.as_deref(),
                &argument,
            );
            items.extend(variable_items(&tree, offset));
            items
        }
        CompletionContext::Directive { location } => builder.directive_items(location),
        CompletionContext::TypeName { input_only } => builder.type_items(input_only),
        CompletionContext::Definition => builder.keyword_items(),
    };

    let word = word_before(text, offset);
    let prefix = text[word.start..word.end].to_lowercase();
    if !prefix.is_empty() {
        items.retain(|item| filter_text(item).to_lowercase().starts_with(&prefix));
    }

    items.sort_by(|a, b| a.sort_key().cmp(b.sort_key()).then_with(|| a.label.cmp(&b.label)));
    items
}

/// Text matched against the partial name: the type of `... on T`, otherwise
/// the label without a leading `$`.
fn filter_text(item: &CompletionItem) -> &str {
    item.label
        .strip_prefix("... on ")
        .or_else(|| item.label.strip_prefix('$'))
        .unwrap_or(&item.label)
}

fn variable_items(tree: &apollo_parser::SyntaxTree, offset: usize) -> Vec<CompletionItem> {
    variables_in_scope(tree, offset)
        .into_iter()
        .map(|(name, ty)| {
            CompletionItem::new(format!("${name}"), CompletionItemKind::Variable)
                .with_detail(ty)
                .with_sort_text(format!("1{name}"))
        })
        .collect()
}

struct ItemBuilder<'a> {
    schema: Option<&'a SchemaEntry>,
}

impl<'a> ItemBuilder<'a> {
    fn schema_ref(&self) -> Option<&'a Schema> {
        self.schema.map(|entry| &**entry.schema())
    }

    fn scope(&self) -> String {
        self.schema
            .map(|entry| entry.scope.to_string())
            .unwrap_or_default()
    }

    fn field_items(&self, parent: &str) -> Vec<CompletionItem> {
        let Some(schema) = self.schema_ref() else {
            return Vec::new();
        };
        let Some(parent_type) = schema.types.get(parent) else {
            return Vec::new();
        };

        let fields = match parent_type {
            ExtendedType::Object(object) => Some(&object.fields),
            ExtendedType::Interface(iface) => Some(&iface.fields),
            _ => None,
        };

        let scope = self.scope();
        let mut items: Vec<CompletionItem> = fields
            .into_iter()
            .flatten()
            .map(|(name, field)| {
                CompletionItem::new(name.as_str(), CompletionItemKind::Field)
                    .with_detail(field.ty.to_string())
                    .with_sort_text(format!("0{name}"))
                    .with_deprecated(deprecation_reason(&field.directives).is_some())
                    .with_data(CompletionData::Field {
                        parent: parent.to_string(),
                        name: name.to_string(),
                        scope: scope.clone(),
                    })
            })
            .collect();

        if is_abstract(parent_type) {
            for member in possible_types(schema, parent) {
                items.push(
                    CompletionItem::new(format!("... on {member}"), CompletionItemKind::Type)
                        .with_insert_text(format!("... on {member} {{\n  \n}}"))
                        .with_sort_text(format!("1{member}"))
                        .with_data(CompletionData::Type {
                            name: member,
                            scope: scope.clone(),
                        }),
                );
            }
        }

        if is_composite(parent_type) {
            items.push(
                CompletionItem::new("__typename", CompletionItemKind::Field)
                    .with_detail("String!")
                    .with_documentation("The name of the current Object type at runtime.")
                    .with_sort_text("2__typename"),
            );
        }

        items
    }

    fn fragment_items(
        &self,
        tree: &apollo_parser::SyntaxTree,
        parent: Option<&str>,
    ) -> Vec<CompletionItem> {
        let schema = self.schema_ref();
        let parent_types = match (schema, parent) {
            (Some(schema), Some(parent)) => Some(possible_types(schema, parent)),
            _ => None,
        };

        let mut items: Vec<CompletionItem> = fragment_definitions(tree)
            .into_iter()
            .filter(|fragment| {
                // Keep fragments whose type can overlap the parent type
                let (Some(schema), Some(parent_types), Some(condition)) =
                    (schema, &parent_types, &fragment.type_condition)
                else {
                    return true;
                };
                possible_types(schema, condition)
                    .iter()
                    .any(|ty| parent_types.contains(ty))
            })
            .map(|fragment| {
                let sort_text = format!("0{}", fragment.name);
                let item = CompletionItem::new(fragment.name, CompletionItemKind::Fragment)
                    .with_sort_text(sort_text);
                match fragment.type_condition {
                    Some(condition) => item.with_detail(format!("on {condition}")),
                    None => item,
                }
            })
            .collect();

        items.push(
            CompletionItem::new("on", CompletionItemKind::Keyword)
                .with_detail("inline fragment")
                .with_sort_text("1on"),
        );
        items
    }

    fn argument_items(
        &self,
        parent: Option<&str>,
        field_name: Option<&str>,
        directive_name: Option<&str>,
        existing: &[String],
    ) -> Vec<CompletionItem> {
        let Some(schema) = self.schema_ref() else {
            return Vec::new();
        };
        let arguments = match (directive_name, field_name, parent) {
            (Some(directive), _, _) => schema
                .directive_definitions
                .get(directive)
                .map(|def| def.arguments.as_slice()),
            (None, Some(field), Some(parent)) => {
                field_definition(schema, parent, field).map(|def| def.arguments.as_slice())
            }
            _ => None,
        };

        arguments
            .unwrap_or_default()
            .iter()
            .filter(|arg| !existing.iter().any(|name| *name == arg.name.as_str()))
            .map(|arg| {
                let item = CompletionItem::new(arg.name.as_str(), CompletionItemKind::Argument)
                    .with_detail(input_value_signature(arg))
                    .with_insert_text(format!("{}: ", arg.name))
                    .with_sort_text(format!(
                        "{}{}",
                        // Required arguments first
                        u8::from(!arg.is_required()),
                        arg.name
                    ))
                    .with_deprecated(deprecation_reason(&arg.directives).is_some());
                match arg.description.as_deref() {
                    Some(description) => item.with_documentation(description),
                    None => item,
                }
            })
            .collect()
    }

    fn argument_value_items(
        &self,
        parent: Option<&str>,
        field_name: Option<&str>,
        directive_name: Option<&str>,
        argument: &str,
    ) -> Vec<CompletionItem> {
        let Some(schema) = self.schema_ref() else {
            return Vec::new();
        };
        let arguments = match (directive_name, field_name, parent) {
            (Some(directive), _, _) => schema
                .directive_definitions
                .get(directive)
                .map(|def| def.arguments.as_slice()),
            (None, Some(field), Some(parent)) => {
                field_definition(schema, parent, field).map(|def| def.arguments.as_slice())
            }
            _ => None,
        };
        let Some(arg) = arguments
            .unwrap_or_default()
            .iter()
            .find(|arg| arg.name == argument)
        else {
            return Vec::new();
        };

        let type_name = arg.ty.inner_named_type();
        match schema.types.get(type_name) {
            Some(ExtendedType::Enum(enum_type)) => enum_type
                .values
                .iter()
                .map(|(name, value)| {
                    let deprecated = deprecation_reason(&value.directives);
                    let item = CompletionItem::new(name.as_str(), CompletionItemKind::EnumValue)
                        .with_detail(type_name.as_str())
                        .with_sort_text(format!("0{name}"))
                        .with_deprecated(deprecated.is_some());
                    match crate::helpers::documentation(
                        value.description.as_deref(),
                        deprecated.as_deref(),
                    ) {
                        Some(doc) => item.with_documentation(doc),
                        None => item,
                    }
                })
                .collect(),
            Some(ExtendedType::Scalar(_)) if type_name == "Boolean" => ["true", "false"]
                .into_iter()
                .map(|value| {
                    CompletionItem::new(value, CompletionItemKind::Keyword)
                        .with_detail("Boolean")
                        .with_sort_text(format!("0{value}"))
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    fn directive_items(&self, location: Option<DirectiveLocation>) -> Vec<CompletionItem> {
        let Some(schema) = self.schema_ref() else {
            return Vec::new();
        };
        let scope = self.scope();

        schema
            .directive_definitions
            .iter()
            .filter(|(_, def)| match location {
                Some(location) => def.locations.contains(&location),
                None => def.locations.iter().copied().any(is_executable_location),
            })
            .map(|(name, def)| {
                let args: Vec<String> = def.arguments.iter().map(|arg| input_value_signature(arg)).collect();
                let detail = if args.is_empty() {
                    format!("@{name}")
                } else {
                    format!("@{name}({})", args.join(", "))
                };
                CompletionItem::new(name.as_str(), CompletionItemKind::Directive)
                    .with_detail(detail)
                    .with_data(CompletionData::Directive {
                        name: name.to_string(),
                        scope: scope.clone(),
                    })
            })
            .collect()
    }

    fn type_items(&self, input_only: bool) -> Vec<CompletionItem> {
        let Some(schema) = self.schema_ref() else {
            return Vec::new();
        };
        let scope = self.scope();

        schema
            .types
            .iter()
            .filter(|(name, _)| !name.starts_with("__"))
            .filter(|(_, ty)| if input_only { is_input(ty) } else { is_composite(ty) })
            .map(|(name, ty)| {
                CompletionItem::new(name.as_str(), CompletionItemKind::Type)
                    .with_detail(type_keyword(ty))
                    .with_data(CompletionData::Type {
                        name: name.to_string(),
                        scope: scope.clone(),
                    })
            })
            .collect()
    }

    fn keyword_items(&self) -> Vec<CompletionItem> {
        let schema = self.schema_ref();
        DEFINITION_KEYWORDS
            .iter()
            .filter(|(_, root)| match (schema, root) {
                (Some(schema), Some(root)) => root_type_name(schema, *root).is_some(),
                _ => true,
            })
            .map(|(keyword, _)| CompletionItem::new(*keyword, CompletionItemKind::Keyword))
            .collect()
    }
}

const fn is_executable_location(location: DirectiveLocation) -> bool {
    matches!(
        location,
        DirectiveLocation::Query
            | DirectiveLocation::Mutation
            | DirectiveLocation::Subscription
            | DirectiveLocation::Field
            | DirectiveLocation::FragmentDefinition
            | DirectiveLocation::FragmentSpread
            | DirectiveLocation::InlineFragment
            | DirectiveLocation::VariableDefinition
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphql_test_utils::extract_cursor;
    use graphql_test_utils::fixtures::{MINIMAL_SCHEMA, RICH_SCHEMA};

    fn complete_with(sdl: Option<&str>, marked: &str) -> Vec<CompletionItem> {
        let (text, position) = extract_cursor(marked);
        let entry = sdl.map(|sdl| SchemaEntry::inline(sdl).unwrap());
        let document = Document::new("file:///query.graphql", "graphql", 1, text);
        completions(&document, position, entry.as_ref())
    }

    fn complete(marked: &str) -> Vec<CompletionItem> {
        complete_with(Some(RICH_SCHEMA), marked)
    }

    fn labels(items: &[CompletionItem]) -> Vec<&str> {
        items.iter().map(|item| item.label.as_str()).collect()
    }

    #[test]
    fn test_unterminated_selection_set_offers_root_fields() {
        let items = complete_with(Some(MINIMAL_SCHEMA), "{ *");
        assert_eq!(labels(&items), vec!["x", "__typename"]);
        assert_eq!(items[0].detail.as_deref(), Some("String"));
        assert_eq!(items[0].sort_text.as_deref(), Some("0x"));
        assert_eq!(
            items[0].data,
            Some(CompletionData::Field {
                parent: "Query".into(),
                name: "x".into(),
                scope: "default".into(),
            })
        );
    }

    #[test]
    fn test_nested_fields_with_prefix() {
        let items = complete("query { viewer { po* } }");
        assert_eq!(labels(&items), vec!["posts"]);
    }

    #[test]
    fn test_prefix_filter_is_case_insensitive() {
        let items = complete("{ VI* }");
        assert_eq!(labels(&items), vec!["viewer"]);
    }

    #[test]
    fn test_deprecated_fields_are_flagged() {
        let items = complete("{ * }");
        let me = items.iter().find(|item| item.label == "me").unwrap();
        assert!(me.deprecated);
        let viewer = items.iter().find(|item| item.label == "viewer").unwrap();
        assert!(!viewer.deprecated);
    }

    #[test]
    fn test_abstract_parent_offers_inline_fragments() {
        let items = complete("{ node(id: 1) { * } }");
        let labels = labels(&items);
        assert_eq!(labels.first(), Some(&"id"));
        assert!(labels.contains(&"... on User"));
        assert!(labels.contains(&"... on Post"));
        assert_eq!(labels.last(), Some(&"__typename"));

        let union_items = complete("{ search(term: \"a\") { * } }");
        assert_eq!(
            labels_of(&union_items),
            vec!["... on Post", "... on User", "__typename"]
        );
    }

    fn labels_of(items: &[CompletionItem]) -> Vec<String> {
        items.iter().map(|item| item.label.clone()).collect()
    }

    #[test]
    fn test_fragment_spread_names() {
        let items = complete(
            "query { viewer { ...* } }\nfragment UserBits on User { id }\nfragment PostBits on Post { id }",
        );
        assert_eq!(labels(&items), vec!["UserBits", "on"]);
        assert_eq!(items[0].detail.as_deref(), Some("on User"));
    }

    #[test]
    fn test_argument_names() {
        let items = complete("{ search(*) { __typename } }");
        assert_eq!(labels(&items), vec!["term", "kind"]);
        assert_eq!(items[0].insert_text.as_deref(), Some("term: "));

        let items = complete("{ search(term: \"a\", *) { __typename } }");
        assert_eq!(labels(&items), vec!["kind"]);
    }

    #[test]
    fn test_argument_values() {
        let items = complete("query Q($k: SearchKind) { search(term: \"a\", kind: *) { __typename } }");
        let labels = labels(&items);
        assert!(labels.contains(&"ALL"));
        assert!(labels.contains(&"LEGACY"));
        assert!(labels.contains(&"$k"));
        let legacy = items.iter().find(|item| item.label == "LEGACY").unwrap();
        assert!(legacy.deprecated);
    }

    #[test]
    fn test_boolean_directive_argument_values() {
        let items = complete("{ viewer @include(if: *) { id } }");
        assert_eq!(labels(&items), vec!["false", "true"]);
    }

    #[test]
    fn test_directives_by_location() {
        let items = complete("{ viewer @* }");
        let labels = labels(&items);
        assert!(labels.contains(&"include"));
        assert!(labels.contains(&"skip"));
        assert!(!labels.contains(&"deprecated"));
        let include = items.iter().find(|item| item.label == "include").unwrap();
        assert_eq!(include.detail.as_deref(), Some("@include(if: Boolean!)"));
    }

    #[test]
    fn test_type_condition_offers_composite_types() {
        let labels = labels_of(&complete("{ node(id: 1) { ... on * } }"));
        assert!(labels.contains(&"User".to_string()));
        assert!(labels.contains(&"SearchResult".to_string()));
        assert!(!labels.contains(&"CreatePostInput".to_string()));
        assert!(!labels.contains(&"__Schema".to_string()));
    }

    #[test]
    fn test_variable_type_offers_input_types() {
        let labels = labels_of(&complete("query Q($input: *) { viewer { id } }"));
        assert!(labels.contains(&"CreatePostInput".to_string()));
        assert!(labels.contains(&"String".to_string()));
        assert!(!labels.contains(&"User".to_string()));
    }

    #[test]
    fn test_definition_keywords_follow_schema_roots() {
        let labels = labels_of(&complete("*"));
        assert_eq!(labels, vec!["fragment", "mutation", "query"]);

        let labels = labels_of(&complete_with(None, "{ x }\nsu*"));
        assert_eq!(labels, vec!["subscription"]);
    }

    #[test]
    fn test_without_schema_only_document_items() {
        assert!(complete_with(None, "{ *").is_empty());
        let items = complete_with(None, "{ ...* }\nfragment F on Query { x }");
        assert_eq!(labels(&items), vec!["F", "on"]);
    }

    #[test]
    fn test_end_of_document_position() {
        let items = complete_with(Some(MINIMAL_SCHEMA), "query { x }\n*");
        assert_eq!(labels_of(&items), vec!["fragment", "query"]);
    }
}
