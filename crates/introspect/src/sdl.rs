//! SDL generation from an introspection result.

use crate::types::{
    IntrospectionDirective, IntrospectionField, IntrospectionInputValue, IntrospectionResponse,
    IntrospectionSchema, IntrospectionType, NamedRef,
};
use std::fmt::{self, Write};

/// Scalars every schema gets for free.
const BUILTIN_SCALARS: &[&str] = &["Int", "Float", "String", "Boolean", "ID"];

/// Directives every schema gets for free.
const BUILTIN_DIRECTIVES: &[&str] = &["skip", "include", "deprecated", "specifiedBy", "oneOf"];

/// Converts an introspection result to SDL.
///
/// Built-in scalars, built-in directives and `__`-prefixed introspection
/// types are left out. Descriptions, deprecations and custom directives are
/// kept. A `schema { ... }` block is emitted only when a root type does not
/// use its conventional name.
#[must_use]
#[tracing::instrument(skip(introspection), fields(
    types = introspection.data.schema.types.len(),
    directives = introspection.data.schema.directives.len()
))]
pub fn introspection_to_sdl(introspection: &IntrospectionResponse) -> String {
    let mut sdl = String::new();
    // Writing into a String cannot fail.
    let _ = write_schema(&mut sdl, &introspection.data.schema);
    tracing::debug!(sdl_length = sdl.len(), "SDL generation complete");
    sdl.trim_end().to_string()
}

fn write_schema(sdl: &mut String, schema: &IntrospectionSchema) -> fmt::Result {
    let roots = [
        ("query", schema.query_type.as_ref(), "Query"),
        ("mutation", schema.mutation_type.as_ref(), "Mutation"),
        ("subscription", schema.subscription_type.as_ref(), "Subscription"),
    ];
    let needs_schema_def = roots
        .iter()
        .any(|(_, root, conventional)| root.is_some_and(|r| r.name != *conventional));

    if needs_schema_def {
        write_description(sdl, schema.description.as_deref(), 0)?;
        sdl.push_str("schema {\n");
        for (operation, root, _) in roots {
            if let Some(root) = root {
                writeln!(sdl, "  {operation}: {}", root.name)?;
            }
        }
        sdl.push_str("}\n\n");
    }

    for directive in &schema.directives {
        if BUILTIN_DIRECTIVES.contains(&directive.name.as_str()) {
            continue;
        }
        write_directive(sdl, directive)?;
        sdl.push_str("\n\n");
    }

    for type_def in &schema.types {
        let name = type_def.name();
        if name.starts_with("__") || BUILTIN_SCALARS.contains(&name) {
            continue;
        }
        write_type(sdl, type_def)?;
        sdl.push_str("\n\n");
    }

    Ok(())
}

fn write_directive(sdl: &mut String, directive: &IntrospectionDirective) -> fmt::Result {
    write_description(sdl, directive.description.as_deref(), 0)?;
    write!(sdl, "directive @{}", directive.name)?;
    write_arguments(sdl, &directive.args)?;
    if directive.is_repeatable {
        sdl.push_str(" repeatable");
    }
    write!(sdl, " on {}", directive.locations.join(" | "))
}

fn write_type(sdl: &mut String, type_def: &IntrospectionType) -> fmt::Result {
    match type_def {
        IntrospectionType::Scalar(t) => {
            write_description(sdl, t.description.as_deref(), 0)?;
            write!(sdl, "scalar {}", t.name)?;
            if let Some(url) = &t.specified_by_url {
                write!(sdl, " @specifiedBy(url: \"{}\")", escape_string(url))?;
            }
        }
        IntrospectionType::Object(t) | IntrospectionType::Interface(t) => {
            let keyword = if matches!(type_def, IntrospectionType::Object(_)) {
                "type"
            } else {
                "interface"
            };
            write_description(sdl, t.description.as_deref(), 0)?;
            write!(sdl, "{keyword} {}", t.name)?;
            write_implements(sdl, t.interfaces.as_deref().unwrap_or_default());
            sdl.push_str(" {\n");
            for field in t.fields.as_deref().unwrap_or_default() {
                write_field(sdl, field)?;
            }
            sdl.push('}');
        }
        IntrospectionType::Union(t) => {
            write_description(sdl, t.description.as_deref(), 0)?;
            write!(sdl, "union {}", t.name)?;
            let members = t.possible_types.as_deref().unwrap_or_default();
            if !members.is_empty() {
                let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
                write!(sdl, " = {}", names.join(" | "))?;
            }
        }
        IntrospectionType::Enum(t) => {
            write_description(sdl, t.description.as_deref(), 0)?;
            writeln!(sdl, "enum {} {{", t.name)?;
            for value in t.enum_values.as_deref().unwrap_or_default() {
                write_description(sdl, value.description.as_deref(), 1)?;
                write!(sdl, "  {}", value.name)?;
                write_deprecation(sdl, value.is_deprecated, value.deprecation_reason.as_deref())?;
                sdl.push('\n');
            }
            sdl.push('}');
        }
        IntrospectionType::InputObject(t) => {
            write_description(sdl, t.description.as_deref(), 0)?;
            writeln!(sdl, "input {} {{", t.name)?;
            for field in t.input_fields.as_deref().unwrap_or_default() {
                write_description(sdl, field.description.as_deref(), 1)?;
                sdl.push_str("  ");
                write_input_value(sdl, field)?;
                sdl.push('\n');
            }
            sdl.push('}');
        }
    }
    Ok(())
}

fn write_implements(sdl: &mut String, interfaces: &[NamedRef]) {
    if interfaces.is_empty() {
        return;
    }
    let names: Vec<&str> = interfaces.iter().map(|i| i.name.as_str()).collect();
    sdl.push_str(" implements ");
    sdl.push_str(&names.join(" & "));
}

fn write_field(sdl: &mut String, field: &IntrospectionField) -> fmt::Result {
    write_description(sdl, field.description.as_deref(), 1)?;
    write!(sdl, "  {}", field.name)?;
    write_arguments(sdl, &field.args)?;
    write!(sdl, ": {}", field.type_ref)?;
    write_deprecation(sdl, field.is_deprecated, field.deprecation_reason.as_deref())?;
    sdl.push('\n');
    Ok(())
}

fn write_arguments(sdl: &mut String, args: &[IntrospectionInputValue]) -> fmt::Result {
    if args.is_empty() {
        return Ok(());
    }
    sdl.push('(');
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            sdl.push_str(", ");
        }
        if let Some(description) = &arg.description {
            write!(sdl, "\"{}\" ", escape_string(description))?;
        }
        write_input_value(sdl, arg)?;
    }
    sdl.push(')');
    Ok(())
}

fn write_input_value(sdl: &mut String, value: &IntrospectionInputValue) -> fmt::Result {
    write!(sdl, "{}: {}", value.name, value.type_ref)?;
    if let Some(default) = &value.default_value {
        write!(sdl, " = {default}")?;
    }
    Ok(())
}

fn write_deprecation(sdl: &mut String, deprecated: bool, reason: Option<&str>) -> fmt::Result {
    if !deprecated {
        return Ok(());
    }
    match reason {
        Some(reason) => write!(sdl, " @deprecated(reason: \"{}\")", escape_string(reason)),
        None => {
            sdl.push_str(" @deprecated");
            Ok(())
        }
    }
}

fn write_description(sdl: &mut String, description: Option<&str>, indent: usize) -> fmt::Result {
    let Some(description) = description else {
        return Ok(());
    };
    let indent = "  ".repeat(indent);
    if description.contains('\n') {
        let escaped = description.replace("\"\"\"", "\\\"\"\"");
        writeln!(sdl, "{indent}\"\"\"\n{escaped}\n{indent}\"\"\"")
    } else {
        writeln!(sdl, "{indent}\"{}\"", escape_string(description))
    }
}

fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(schema: serde_json::Value) -> IntrospectionResponse {
        serde_json::from_value(serde_json::json!({ "data": { "__schema": schema } })).unwrap()
    }

    #[test]
    fn test_escape_string() {
        assert_eq!(escape_string("hello"), "hello");
        assert_eq!(escape_string("hello \"world\""), "hello \\\"world\\\"");
        assert_eq!(escape_string("hello\nworld"), "hello\\nworld");
        assert_eq!(escape_string("C:\\path"), "C:\\\\path");
    }

    #[test]
    fn test_object_with_deprecated_field() {
        let sdl = introspection_to_sdl(&response(serde_json::json!({
            "queryType": { "name": "Query" },
            "types": [
                { "kind": "OBJECT", "name": "Query", "description": "Root", "interfaces": [], "fields": [
                    { "name": "user", "description": null,
                      "args": [{ "name": "id", "type": { "kind": "NON_NULL", "ofType": { "kind": "SCALAR", "name": "ID" } } }],
                      "type": { "kind": "OBJECT", "name": "User" }, "isDeprecated": false },
                    { "name": "old", "args": [], "type": { "kind": "SCALAR", "name": "String" },
                      "isDeprecated": true, "deprecationReason": "Use user" }
                ] },
                { "kind": "SCALAR", "name": "String" },
                { "kind": "OBJECT", "name": "__Type", "fields": [] }
            ],
            "directives": [
                { "name": "skip", "locations": ["FIELD"], "args": [] },
                { "name": "cached", "locations": ["FIELD", "QUERY"], "args": [], "isRepeatable": true }
            ]
        })));

        assert!(sdl.contains("\"Root\"\ntype Query {"));
        assert!(sdl.contains("  user(id: ID!): User\n"));
        assert!(sdl.contains("  old: String @deprecated(reason: \"Use user\")"));
        assert!(sdl.contains("directive @cached repeatable on FIELD | QUERY"));
        assert!(!sdl.contains("scalar String"));
        assert!(!sdl.contains("__Type"));
        assert!(!sdl.contains("@skip"));
        assert!(!sdl.contains("schema {"));
    }

    #[test]
    fn test_schema_definition_for_renamed_roots() {
        let sdl = introspection_to_sdl(&response(serde_json::json!({
            "queryType": { "name": "RootQuery" },
            "mutationType": null,
            "types": [
                { "kind": "OBJECT", "name": "RootQuery", "fields": [
                    { "name": "ok", "args": [], "type": { "kind": "SCALAR", "name": "Boolean" } }
                ] }
            ]
        })));
        assert!(sdl.starts_with("schema {\n  query: RootQuery\n}"));
        assert!(!sdl.contains("mutation:"));
    }

    #[test]
    fn test_union_enum_input() {
        let sdl = introspection_to_sdl(&response(serde_json::json!({
            "queryType": { "name": "Query" },
            "types": [
                { "kind": "UNION", "name": "SearchResult", "possibleTypes": [{ "name": "A" }, { "name": "B" }] },
                { "kind": "ENUM", "name": "Color", "enumValues": [
                    { "name": "RED", "isDeprecated": false },
                    { "name": "BLUE", "isDeprecated": true }
                ] },
                { "kind": "INPUT_OBJECT", "name": "Filter", "inputFields": [
                    { "name": "limit", "type": { "kind": "SCALAR", "name": "Int" }, "defaultValue": "10" }
                ] }
            ]
        })));
        assert!(sdl.contains("union SearchResult = A | B"));
        assert!(sdl.contains("enum Color {\n  RED\n  BLUE @deprecated\n}"));
        assert!(sdl.contains("input Filter {\n  limit: Int = 10\n}"));
    }
}
