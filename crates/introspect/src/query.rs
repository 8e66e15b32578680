//! The standard introspection query sent by `POST` schema requests.

/// Introspection query covering root types, every type with deprecated
/// members included, directives, and type references nested deeply enough
/// for wrappers like `[[[String!]!]!]`.
pub const INTROSPECTION_QUERY: &str = r"
query IntrospectionQuery {
  __schema {
    queryType { name }
    mutationType { name }
    subscriptionType { name }
    types {
      ...FullType
    }
    directives {
      name
      description
      locations
      args {
        ...InputValue
      }
    }
  }
}

fragment FullType on __Type {
  kind
  name
  description
  fields(includeDeprecated: true) {
    name
    description
    args {
      ...InputValue
    }
    type {
      ...TypeRef
    }
    isDeprecated
    deprecationReason
  }
  inputFields {
    ...InputValue
  }
  interfaces {
    ...TypeRef
  }
  enumValues(includeDeprecated: true) {
    name
    description
    isDeprecated
    deprecationReason
  }
  possibleTypes {
    ...TypeRef
  }
}

fragment InputValue on __InputValue {
  name
  description
  type {
    ...TypeRef
  }
  defaultValue
}

fragment TypeRef on __Type {
  kind
  name
  ofType {
    kind
    name
    ofType {
      kind
      name
      ofType {
        kind
        name
        ofType {
          kind
          name
          ofType {
            kind
            name
            ofType {
              kind
              name
              ofType {
                kind
                name
              }
            }
          }
        }
      }
    }
  }
}
";


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_introspection_query_parses() {
        let tree = apollo_parser::Parser::new(INTROSPECTION_QUERY).parse();
        assert_eq!(tree.errors().len(), 0);
        assert!(INTROSPECTION_QUERY.contains("__schema"));
        assert!(INTROSPECTION_QUERY.contains("includeDeprecated: true"));
    }
}
