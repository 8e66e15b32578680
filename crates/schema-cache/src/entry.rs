//! Cached schema entries and how they are built.

use crate::{Result, SchemaError};
use apollo_compiler::validation::Valid;
use apollo_compiler::Schema;
use graphql_config::{RequestMethod, ScopeKey};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

/// Where an entry's payload came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaOrigin {
    /// Fetched through the schema transport
    Remote {
        url: String,
        headers: BTreeMap<String, String>,
        method: RequestMethod,
    },
    /// Inlined in the settings
    Inline,
}

/// A successfully built schema for one scope.
#[derive(Debug)]
pub struct SchemaEntry {
    pub scope: ScopeKey,
    pub origin: SchemaOrigin,
    /// Payload as received (SDL or introspection JSON)
    pub source: Arc<str>,
    /// Payload normalised to SDL
    pub sdl: Arc<str>,
    pub schema: Arc<Valid<Schema>>,
    pub fetched_at: Instant,
    /// Fetch generation that produced this entry
    pub generation: u64,
}

impl SchemaEntry {
    /// Build an entry from SDL.
    pub fn from_sdl(
        scope: ScopeKey,
        origin: SchemaOrigin,
        source: impl Into<Arc<str>>,
        sdl: impl Into<Arc<str>>,
        generation: u64,
    ) -> Result<Self> {
        let sdl = sdl.into();
        let schema = build_schema(&sdl, &scope)?;
        Ok(Self {
            scope,
            origin,
            source: source.into(),
            sdl,
            schema: Arc::new(schema),
            fetched_at: Instant::now(),
            generation,
        })
    }

    /// Convenience for tests and inline settings: an entry for `sdl` in the
    /// default scope.
    pub fn inline(sdl: &str) -> Result<Self> {
        Self::from_sdl(ScopeKey::default_scope(), SchemaOrigin::Inline, sdl, sdl, 0)
    }

    #[must_use]
    pub fn schema(&self) -> &Valid<Schema> {
        &self.schema
    }

    /// Endpoint URL for remote entries.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match &self.origin {
            SchemaOrigin::Remote { url, .. } => Some(url),
            SchemaOrigin::Inline => None,
        }
    }
}

/// Parse and validate SDL. Any error makes the whole schema unusable.
pub(crate) fn build_schema(sdl: &str, scope: &ScopeKey) -> Result<Valid<Schema>> {
    let path = format!("{scope}.graphql");
    Schema::parse_and_validate(sdl, path).map_err(|with_errors| {
        let messages: Vec<String> = with_errors
            .errors
            .iter()
            .map(|diag| match diag.line_column_range() {
                Some(range) => format!(
                    "{}:{}: {}",
                    range.start.line, range.start.column, diag.error
                ),
                None => diag.error.to_string(),
            })
            .collect();
        tracing::warn!(
            scope = %scope,
            error_count = messages.len(),
            "Schema failed to build"
        );
        SchemaError::Parse(messages.join("; "))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_entry() {
        let entry = SchemaEntry::inline("type Query { x: String }").unwrap();
        assert!(entry.schema().types.contains_key("Query"));
        assert_eq!(entry.url(), None);
        assert!(entry.scope.is_default());
    }

    #[test]
    fn test_invalid_sdl_is_parse_error() {
        let err = SchemaEntry::inline("type Query { x: Missing }").unwrap_err();
        match err {
            SchemaError::Parse(message) => assert!(message.contains("Missing"), "{message}"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_syntax_error_is_parse_error() {
        let err = SchemaEntry::inline("type Query {").unwrap_err();
        assert!(matches!(err, SchemaError::Parse(_)));
    }
}
