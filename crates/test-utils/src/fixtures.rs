//! Shared test fixtures for GraphQL schemas and payloads.
//!
//! Use these when the specific schema doesn't matter. When the schema shape
//! is what the test is about, prefer an inline fixture.

/// The smallest useful schema: one nullable `String` field.
pub const MINIMAL_SCHEMA: &str = "type Query { x: String }";

/// Query root with a `User` type.
pub const BASIC_SCHEMA: &str = r#"
type Query {
    user(id: ID!): User
    users(first: Int, after: String): [User!]!
}

type User {
    id: ID!
    name: String!
    email: String!
}
"#;

/// Schema exercising most type kinds, descriptions and deprecations.
///
/// Covers:
/// - interface and union return types
/// - enum arguments with a deprecated value
/// - input object arguments
/// - a deprecated field with a reason
/// - a mutation root
pub const RICH_SCHEMA: &str = r#"
"""
Entry point for reads
"""
type Query {
    "Look up any node by id"
    node(id: ID!): Node
    search(term: String!, kind: SearchKind = ALL): [SearchResult!]!
    viewer: User
    "Use viewer instead"
    me: User @deprecated(reason: "Use `viewer`")
}

type Mutation {
    createPost(input: CreatePostInput!): Post
}

interface Node {
    id: ID!
}

"""
A person with an account
"""
type User implements Node {
    id: ID!
    name: String!
    "Primary email address"
    email: String
    posts(first: Int): [Post!]!
    legacyId: Int @deprecated
}

type Post implements Node {
    id: ID!
    title: String!
    author: User!
    status: PostStatus!
}

union SearchResult = User | Post

enum SearchKind {
    ALL
    USERS
    POSTS
    LEGACY @deprecated(reason: "No longer indexed")
}

enum PostStatus {
    DRAFT
    PUBLISHED
}

input CreatePostInput {
    title: String!
    status: PostStatus = DRAFT
}
"#;

/// Introspection response for [`MINIMAL_SCHEMA`], as an endpoint would
/// return it.
pub const MINIMAL_INTROSPECTION: &str = r#"{
  "data": {
    "__schema": {
      "queryType": { "name": "Query" },
      "mutationType": null,
      "subscriptionType": null,
      "types": [
        {
          "kind": "OBJECT",
          "name": "Query",
          "description": null,
          "fields": [
            {
              "name": "x",
              "description": null,
              "args": [],
              "type": { "kind": "SCALAR", "name": "String", "ofType": null },
              "isDeprecated": false,
              "deprecationReason": null
            }
          ],
          "inputFields": null,
          "interfaces": [],
          "enumValues": null,
          "possibleTypes": null
        },
        {
          "kind": "SCALAR",
          "name": "String",
          "description": "Built-in String",
          "fields": null,
          "inputFields": null,
          "interfaces": null,
          "enumValues": null,
          "possibleTypes": null
        }
      ],
      "directives": []
    }
  }
}"#;

/// Parsed form of [`MINIMAL_INTROSPECTION`].
///
/// # Panics
///
/// Never, the fixture is valid JSON.
pub fn minimal_introspection_value() -> serde_json::Value {
    serde_json::from_str(MINIMAL_INTROSPECTION).expect("fixture is valid JSON")
}
