//! Completion item resolution.
//!
//! Completion lists stay cheap by leaving documentation out. The editor asks
//! for it when an item is focused; the item's `data` names the schema element
//! to describe.

use apollo_compiler::schema::ExtendedType;
use graphql_schema_cache::SchemaEntry;

use crate::helpers::{
    deprecation_reason, documentation, field_definition, input_value_signature, type_keyword,
};
use crate::types::{CompletionData, CompletionItem};

/// Fill `documentation` and `detail` when they are missing.
///
/// Fields already present are never replaced, so the result is a superset of
/// the input. Without a matching schema element the item comes back as is.
pub(crate) fn resolve_completion(item: CompletionItem, schema: Option<&SchemaEntry>) -> CompletionItem {
    let (Some(data), Some(entry)) = (item.data.clone(), schema) else {
        return item;
    };
    if data.scope() != entry.scope.as_str() {
        tracing::debug!(
            item_scope = data.scope(),
            schema_scope = %entry.scope,
            "Completion item belongs to another scope"
        );
        return item;
    }

    let schema = entry.schema();
    let (detail, docs) = match &data {
        CompletionData::Field { parent, name, .. } => {
            let Some(field) = field_definition(schema, parent, name) else {
                return item;
            };
            let reason = deprecation_reason(&field.directives);
            (
                field.ty.to_string(),
                documentation(field.description.as_deref(), reason.as_deref()),
            )
        }
        CompletionData::Type { name, .. } => {
            let Some(ty) = schema.types.get(name.as_str()) else {
                return item;
            };
            let description = match ty {
                ExtendedType::Scalar(t) => t.description.as_deref(),
                ExtendedType::Object(t) => t.description.as_deref(),
                ExtendedType::Interface(t) => t.description.as_deref(),
                ExtendedType::Union(t) => t.description.as_deref(),
                ExtendedType::Enum(t) => t.description.as_deref(),
                ExtendedType::InputObject(t) => t.description.as_deref(),
            };
            (
                format!("{} {name}", type_keyword(ty)),
                documentation(description, None),
            )
        }
        CompletionData::Directive { name, .. } => {
            let Some(directive) = schema.directive_definitions.get(name.as_str()) else {
                return item;
            };
            let args: Vec<String> = directive
                .arguments
                .iter()
                .map(|arg| input_value_signature(arg))
                .collect();
            let detail = if args.is_empty() {
                format!("@{name}")
            } else {
                format!("@{name}({})", args.join(", "))
            };
            (detail, documentation(directive.description.as_deref(), None))
        }
    };

    let mut resolved = item;
    if resolved.detail.is_none() {
        resolved.detail = Some(detail);
    }
    if resolved.documentation.is_none() {
        resolved.documentation = docs;
    }
    resolved
}
