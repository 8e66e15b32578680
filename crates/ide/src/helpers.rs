//! Shared helpers: CST ranges, schema lookups and text formatting.

use apollo_compiler::ast::{self, OperationType};
use apollo_compiler::schema::{Component, ExtendedType, FieldDefinition};
use apollo_compiler::Schema;
use apollo_parser::cst::{self, CstNode};
use graphql_syntax::LineIndex;
use graphql_types::{OffsetRange, Range};

/// Reason reported for `@deprecated` without an explicit `reason`.
pub const DEFAULT_DEPRECATION_REASON: &str = "No longer supported";

/// Byte range of a CST node.
pub fn node_offset_range<T: CstNode>(node: &T) -> OffsetRange {
    let range = node.syntax().text_range();
    OffsetRange::new(range.start().into(), range.end().into())
}

/// Editor range of a CST node.
pub fn node_range<T: CstNode>(line_index: &LineIndex, node: &T) -> Range {
    line_index.range(node_offset_range(node))
}

/// Check if a byte offset falls within the range of a CST node
pub fn is_within_range<T: CstNode>(node: &T, byte_offset: usize) -> bool {
    let range = node_offset_range(node);
    byte_offset >= range.start && byte_offset < range.end
}

/// Check if a cursor sits between a node's delimiters: after its first byte
/// and before its last.
///
/// Used for brace-, paren- and bracket-delimited nodes, where a cursor right
/// before the opening token or right after the closing one is outside.
pub fn is_inside_delimiters<T: CstNode>(node: &T, byte_offset: usize) -> bool {
    let range = node_offset_range(node);
    byte_offset > range.start && byte_offset < range.end
}

pub fn name_text(name: &cst::Name) -> String {
    name.text().to_string()
}

/// Name of a named type reference, e.g. the `User` in `on User`.
pub fn named_type_text(named: &cst::NamedType) -> Option<String> {
    named.name().map(|name| name_text(&name))
}

/// Operation type of a CST operation. Shorthand `{ ... }` is a query.
pub fn cst_operation_type(op: &cst::OperationDefinition) -> OperationType {
    match op.operation_type() {
        Some(op_type) if op_type.mutation_token().is_some() => OperationType::Mutation,
        Some(op_type) if op_type.subscription_token().is_some() => OperationType::Subscription,
        _ => OperationType::Query,
    }
}

/// Keyword introducing an operation of this type.
pub const fn operation_keyword(operation_type: OperationType) -> &'static str {
    match operation_type {
        OperationType::Query => "query",
        OperationType::Mutation => "mutation",
        OperationType::Subscription => "subscription",
    }
}

/// Root type name for an operation type, if the schema defines one.
pub fn root_type_name(schema: &Schema, operation_type: OperationType) -> Option<&str> {
    let root = match operation_type {
        OperationType::Query => &schema.schema_definition.query,
        OperationType::Mutation => &schema.schema_definition.mutation,
        OperationType::Subscription => &schema.schema_definition.subscription,
    };
    root.as_ref().map(|component| component.name.as_str())
}

/// Field definition on an object or interface type, including the
/// introspection meta-fields.
pub fn field_definition<'a>(
    schema: &'a Schema,
    type_name: &str,
    field_name: &str,
) -> Option<&'a Component<FieldDefinition>> {
    schema.type_field(type_name, field_name).ok()
}

/// `Some(reason)` if the directive list carries `@deprecated`.
pub fn deprecation_reason(directives: &ast::DirectiveList) -> Option<String> {
    for directive in directives {
        if directive.name == "deprecated" {
            let reason = directive.arguments.iter().find_map(|arg| {
                if arg.name == "reason" {
                    if let ast::Value::String(s) = &*arg.value {
                        return Some(s.to_string());
                    }
                }
                None
            });
            return Some(reason.unwrap_or_else(|| DEFAULT_DEPRECATION_REASON.to_string()));
        }
    }
    None
}

/// Keyword used to declare a type of this kind in SDL.
pub const fn type_keyword(ty: &ExtendedType) -> &'static str {
    match ty {
        ExtendedType::Scalar(_) => "scalar",
        ExtendedType::Object(_) => "type",
        ExtendedType::Interface(_) => "interface",
        ExtendedType::Union(_) => "union",
        ExtendedType::Enum(_) => "enum",
        ExtendedType::InputObject(_) => "input",
    }
}

/// `true` for object, interface and union types.
pub const fn is_composite(ty: &ExtendedType) -> bool {
    matches!(
        ty,
        ExtendedType::Object(_) | ExtendedType::Interface(_) | ExtendedType::Union(_)
    )
}

/// `true` for types usable as variable types.
pub const fn is_input(ty: &ExtendedType) -> bool {
    matches!(
        ty,
        ExtendedType::Scalar(_) | ExtendedType::Enum(_) | ExtendedType::InputObject(_)
    )
}

/// `true` for interface and union types.
pub const fn is_abstract(ty: &ExtendedType) -> bool {
    matches!(ty, ExtendedType::Interface(_) | ExtendedType::Union(_))
}

/// Object types a value of `type_name` can be at runtime.
pub fn possible_types(schema: &Schema, type_name: &str) -> Vec<String> {
    match schema.types.get(type_name) {
        Some(ExtendedType::Union(union_type)) => union_type
            .members
            .iter()
            .map(|member| member.name.to_string())
            .collect(),
        Some(ExtendedType::Interface(_)) => schema
            .types
            .iter()
            .filter_map(|(name, ty)| match ty {
                ExtendedType::Object(object)
                    if object
                        .implements_interfaces
                        .iter()
                        .any(|iface| iface.name == type_name) =>
                {
                    Some(name.to_string())
                }
                _ => None,
            })
            .collect(),
        Some(ExtendedType::Object(_)) => vec![type_name.to_string()],
        _ => Vec::new(),
    }
}

/// `name(arg: Type = default): Type`
pub fn field_signature(name: &str, field: &FieldDefinition) -> String {
    if field.arguments.is_empty() {
        return format!("{name}: {}", field.ty);
    }
    let args: Vec<String> = field
        .arguments
        .iter()
        .map(|arg| input_value_signature(arg))
        .collect();
    format!("{name}({}): {}", args.join(", "), field.ty)
}

/// `name: Type = default`
pub fn input_value_signature(value: &ast::InputValueDefinition) -> String {
    match &value.default_value {
        Some(default) => format!("{}: {} = {default}", value.name, value.ty),
        None => format!("{}: {}", value.name, value.ty),
    }
}

/// Description followed by a deprecation notice, as markdown.
pub fn documentation(description: Option<&str>, deprecation: Option<&str>) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(description) = description.filter(|d| !d.trim().is_empty()) {
        parts.push(description.trim().to_string());
    }
    if let Some(reason) = deprecation {
        parts.push(format!("**Deprecated:** {reason}"));
    }
    (!parts.is_empty()).then(|| parts.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphql_test_utils::fixtures::RICH_SCHEMA;

    fn schema() -> apollo_compiler::validation::Valid<Schema> {
        Schema::parse_and_validate(RICH_SCHEMA, "schema.graphql").unwrap()
    }

    #[test]
    fn test_possible_types() {
        let schema = schema();
        let mut node = possible_types(&schema, "Node");
        node.sort();
        assert_eq!(node, vec!["Post", "User"]);
        assert_eq!(possible_types(&schema, "SearchResult"), vec!["User", "Post"]);
        assert_eq!(possible_types(&schema, "User"), vec!["User"]);
        assert!(possible_types(&schema, "PostStatus").is_empty());
    }

    #[test]
    fn test_field_definition_and_signature() {
        let schema = schema();
        let field = field_definition(&schema, "Query", "search").unwrap();
        assert_eq!(
            field_signature("search", field),
            "search(term: String!, kind: SearchKind = ALL): [SearchResult!]!"
        );
        assert!(field_definition(&schema, "Query", "__typename").is_some());
        assert!(field_definition(&schema, "Query", "missing").is_none());
    }

    #[test]
    fn test_deprecation_reason() {
        let schema = schema();
        let me = field_definition(&schema, "Query", "me").unwrap();
        assert_eq!(deprecation_reason(&me.directives).as_deref(), Some("Use `viewer`"));

        let legacy = field_definition(&schema, "User", "legacyId").unwrap();
        assert_eq!(
            deprecation_reason(&legacy.directives).as_deref(),
            Some(DEFAULT_DEPRECATION_REASON)
        );

        let viewer = field_definition(&schema, "Query", "viewer").unwrap();
        assert_eq!(deprecation_reason(&viewer.directives), None);
    }

    #[test]
    fn test_root_type_name() {
        let schema = schema();
        assert_eq!(root_type_name(&schema, OperationType::Query), Some("Query"));
        assert_eq!(root_type_name(&schema, OperationType::Mutation), Some("Mutation"));
        assert_eq!(root_type_name(&schema, OperationType::Subscription), None);
    }

    #[test]
    fn test_documentation() {
        assert_eq!(documentation(None, None), None);
        assert_eq!(
            documentation(Some(" Primary email "), Some("gone")).as_deref(),
            Some("Primary email\n\n**Deprecated:** gone")
        );
    }
}
