//! Serde model of an introspection result.
//!
//! Fields that older servers omit or return as `null` are optional here so a
//! partial result still converts.

use serde::{Deserialize, Serialize};

/// `{ "data": { "__schema": ... } }` as returned by a GraphQL endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntrospectionResponse {
    pub data: IntrospectionData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntrospectionData {
    #[serde(rename = "__schema")]
    pub schema: IntrospectionSchema,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionSchema {
    #[serde(default)]
    pub description: Option<String>,
    pub query_type: Option<NamedRef>,
    #[serde(default)]
    pub mutation_type: Option<NamedRef>,
    #[serde(default)]
    pub subscription_type: Option<NamedRef>,
    pub types: Vec<IntrospectionType>,
    #[serde(default)]
    pub directives: Vec<IntrospectionDirective>,
}

/// Reference to a named type (`{ "name": "Query" }`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntrospectionType {
    Scalar(ScalarType),
    Object(ObjectType),
    Interface(ObjectType),
    Union(UnionType),
    Enum(EnumType),
    InputObject(InputObjectType),
}

impl IntrospectionType {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Scalar(t) => &t.name,
            Self::Object(t) | Self::Interface(t) => &t.name,
            Self::Union(t) => &t.name,
            Self::Enum(t) => &t.name,
            Self::InputObject(t) => &t.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalarType {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "specifiedByURL")]
    pub specified_by_url: Option<String>,
}

/// Object and interface types share one shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectType {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Option<Vec<IntrospectionField>>,
    #[serde(default)]
    pub interfaces: Option<Vec<NamedRef>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnionType {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub possible_types: Option<Vec<NamedRef>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumType {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub enum_values: Option<Vec<IntrospectionEnumValue>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputObjectType {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub input_fields: Option<Vec<IntrospectionInputValue>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionField {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub args: Vec<IntrospectionInputValue>,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    #[serde(default)]
    pub is_deprecated: bool,
    #[serde(default)]
    pub deprecation_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionInputValue {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    #[serde(default)]
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionEnumValue {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_deprecated: bool,
    #[serde(default)]
    pub deprecation_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionDirective {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub locations: Vec<String>,
    #[serde(default)]
    pub args: Vec<IntrospectionInputValue>,
    #[serde(default)]
    pub is_repeatable: bool,
}

/// A possibly wrapped type reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRef {
    pub kind: TypeKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub of_type: Option<Box<TypeRef>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
}

impl std::fmt::Display for TypeRef {
    /// `String`, `String!`, `[String]`, `[String!]!` and so on.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.kind, self.of_type.as_deref()) {
            (TypeKind::NonNull, Some(inner)) => write!(f, "{inner}!"),
            (TypeKind::List, Some(inner)) => write!(f, "[{inner}]"),
            _ => write!(f, "{}", self.name.as_deref().unwrap_or_default()),
        }
    }
}
