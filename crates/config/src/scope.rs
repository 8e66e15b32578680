//! Mapping documents to schema scopes.

use crate::settings::expand_braces;
use crate::{ConfigError, LanguageSettings, RequestMethod, Result, SchemaSource};
use graphql_types::DocumentUri;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Identifies one schema: `default` or a project name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeKey(Arc<str>);

impl ScopeKey {
    /// Scope of documents that match no project.
    pub const DEFAULT: &'static str = "default";

    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn default_scope() -> Self {
        Self::new(Self::DEFAULT)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        &*self.0 == Self::DEFAULT
    }
}

impl std::fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Schema payload location after project fallback is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedSource {
    Url(String),
    Sdl(String),
    Introspection(serde_json::Value),
}

impl ResolvedSource {
    fn from_source(source: &SchemaSource) -> Option<Self> {
        if let Some(sdl) = &source.sdl {
            return Some(Self::Sdl(sdl.clone()));
        }
        if let Some(introspection) = &source.introspection {
            return Some(Self::Introspection(introspection.clone()));
        }
        source.url.clone().map(Self::Url)
    }

    /// Endpoint URL for remote sources.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Url(url) => Some(url),
            Self::Sdl(_) | Self::Introspection(_) => None,
        }
    }
}

/// Everything that determines the content of one scope's schema.
///
/// Two settings values serve the same schema for a scope iff their
/// `ScopeConfig`s are equal; anything else forces the scope to be refetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeConfig {
    pub scope: ScopeKey,
    pub source: ResolvedSource,
    pub headers: BTreeMap<String, String>,
    pub method: RequestMethod,
    pub requests_enabled: bool,
}

/// Compiled project document patterns.
///
/// Built once per settings value; [`scope_for`](Self::scope_for) only runs
/// the compiled globs.
#[derive(Debug, Clone, Default)]
pub struct ScopeMatcher {
    projects: Vec<(ScopeKey, Vec<glob::Pattern>)>,
}

impl ScopeMatcher {
    /// Compile every project's document patterns. Fails on the first invalid
    /// pattern.
    pub fn try_new(settings: &LanguageSettings) -> Result<Self> {
        let projects = settings
            .projects
            .iter()
            .map(|(name, project)| -> Result<(ScopeKey, Vec<glob::Pattern>)> {
                let patterns = project
                    .documents
                    .iter()
                    .map(|pattern| compile_pattern(name, pattern))
                    .collect::<Result<Vec<_>>>()?;
                Ok((ScopeKey::new(name.as_str()), patterns.concat()))
            })
            .collect::<Result<_>>()?;
        Ok(Self { projects })
    }

    /// Compile every project's document patterns, skipping invalid ones.
    #[must_use]
    pub fn new(settings: &LanguageSettings) -> Self {
        let projects = settings
            .projects
            .iter()
            .map(|(name, project)| {
                let patterns = project
                    .documents
                    .iter()
                    .flat_map(|pattern| match compile_pattern(name, pattern) {
                        Ok(globs) => globs,
                        Err(e) => {
                            tracing::warn!(error = %e, "Skipping invalid document pattern");
                            Vec::new()
                        }
                    })
                    .collect();
                (ScopeKey::new(name.as_str()), patterns)
            })
            .collect();
        Self { projects }
    }

    /// The scope serving `uri`: the first project (by name) whose document
    /// patterns match the URI path, otherwise [`ScopeKey::DEFAULT`].
    #[must_use]
    pub fn scope_for(&self, uri: &DocumentUri) -> ScopeKey {
        let path = uri.path();
        let relative = path.trim_start_matches('/');

        for (scope, patterns) in &self.projects {
            if patterns
                .iter()
                .any(|glob| glob.matches(path) || glob.matches(relative))
            {
                tracing::trace!(uri = %uri, project = %scope, "Matched project");
                return scope.clone();
            }
        }

        ScopeKey::default_scope()
    }
}

fn compile_pattern(project: &str, pattern: &str) -> Result<Vec<glob::Pattern>> {
    expand_braces(pattern)
        .iter()
        .map(|expanded| {
            glob::Pattern::new(expanded).map_err(|e| ConfigError::InvalidGlob {
                project: project.to_string(),
                pattern: pattern.to_string(),
                message: e.to_string(),
            })
        })
        .collect()
}

impl LanguageSettings {
    /// Effective configuration of a scope, or `None` when no schema is
    /// configured for it.
    #[must_use]
    pub fn scope_config(&self, scope: &ScopeKey) -> Option<ScopeConfig> {
        let (schema, headers, method) = if scope.is_default() {
            (
                self.schema.as_ref(),
                &self.request_headers,
                self.request_method,
            )
        } else {
            let project = self.projects.get(scope.as_str())?;
            (
                project.schema.as_ref().or(self.schema.as_ref()),
                project
                    .request_headers
                    .as_ref()
                    .unwrap_or(&self.request_headers),
                project.request_method.unwrap_or(self.request_method),
            )
        };

        let source = ResolvedSource::from_source(schema?)?;

        Some(ScopeConfig {
            scope: scope.clone(),
            source,
            headers: headers.clone(),
            method,
            requests_enabled: self.enable_schema_request,
        })
    }

    /// Every scope these settings define.
    #[must_use]
    pub fn scopes(&self) -> Vec<ScopeKey> {
        std::iter::once(ScopeKey::default_scope())
            .chain(self.projects.keys().map(|name| ScopeKey::new(name.as_str())))
            .collect()
    }

    /// Scopes whose effective configuration differs between `self` and `other`.
    #[must_use]
    pub fn changed_scopes(&self, other: &Self) -> Vec<ScopeKey> {
        let mut scopes = self.scopes();
        for scope in other.scopes() {
            if !scopes.contains(&scope) {
                scopes.push(scope);
            }
        }
        scopes
            .into_iter()
            .filter(|scope| self.scope_config(scope) != other.scope_config(scope))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProjectSettings;

    fn settings_with_admin() -> LanguageSettings {
        let mut settings = LanguageSettings::with_url("https://api.example.com/graphql");
        settings
            .request_headers
            .insert("Authorization".to_string(), "Bearer a".to_string());
        settings.projects.insert(
            "admin".to_string(),
            ProjectSettings {
                documents: vec!["**/admin/**".to_string()],
                schema: Some(SchemaSource::url("https://admin.example.com/graphql")),
                request_headers: None,
                request_method: Some(RequestMethod::Post),
            },
        );
        settings
    }

    #[test]
    fn test_scope_for_matches_project() {
        let settings = settings_with_admin();
        let matcher = ScopeMatcher::try_new(&settings).unwrap();
        let uri = DocumentUri::new("file:///repo/src/admin/users.graphql");
        assert_eq!(matcher.scope_for(&uri).as_str(), "admin");
    }

    #[test]
    fn test_scope_for_falls_back_to_default() {
        let settings = settings_with_admin();
        let matcher = ScopeMatcher::try_new(&settings).unwrap();
        let uri = DocumentUri::new("inmemory://model/1");
        assert!(matcher.scope_for(&uri).is_default());
    }

    #[test]
    fn test_scope_for_brace_patterns() {
        let mut settings = LanguageSettings::default();
        settings.projects.insert(
            "web".to_string(),
            ProjectSettings {
                documents: vec!["web/**/*.{graphql,gql}".to_string()],
                schema: None,
                request_headers: None,
                request_method: None,
            },
        );
        let matcher = ScopeMatcher::try_new(&settings).unwrap();
        assert_eq!(
            matcher.scope_for(&DocumentUri::new("file:///web/pages/home.gql")).as_str(),
            "web"
        );
        assert_eq!(
            matcher.scope_for(&DocumentUri::new("file:///web/pages/home.graphql")).as_str(),
            "web"
        );
    }

    #[test]
    fn test_invalid_pattern_fails_to_compile_or_is_skipped() {
        let mut settings = settings_with_admin();
        settings
            .projects
            .get_mut("admin")
            .unwrap()
            .documents
            .insert(0, "src/[unclosed".to_string());

        let err = ScopeMatcher::try_new(&settings).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidGlob { ref project, .. } if project == "admin"));

        let matcher = ScopeMatcher::new(&settings);
        let uri = DocumentUri::new("file:///repo/src/admin/users.graphql");
        assert_eq!(matcher.scope_for(&uri).as_str(), "admin");
    }

    #[test]
    fn test_scope_config_falls_back_to_top_level() {
        let settings = settings_with_admin();
        let admin = settings.scope_config(&ScopeKey::new("admin")).unwrap();
        assert_eq!(
            admin.source,
            ResolvedSource::Url("https://admin.example.com/graphql".to_string())
        );
        assert_eq!(admin.method, RequestMethod::Post);
        assert_eq!(admin.headers.get("Authorization").map(String::as_str), Some("Bearer a"));

        let default = settings.scope_config(&ScopeKey::default_scope()).unwrap();
        assert_eq!(default.method, RequestMethod::Get);
    }

    #[test]
    fn test_scope_config_unconfigured() {
        let settings = LanguageSettings::default();
        assert!(settings.scope_config(&ScopeKey::default_scope()).is_none());
        assert!(settings.scope_config(&ScopeKey::new("missing")).is_none());
    }

    #[test]
    fn test_changed_scopes() {
        let old = settings_with_admin();

        let mut new = old.clone();
        new.formatting_options.tab_size = 8;
        assert!(old.changed_scopes(&new).is_empty());

        new.projects.get_mut("admin").unwrap().schema =
            Some(SchemaSource::sdl("type Query { a: Int }"));
        assert_eq!(old.changed_scopes(&new), vec![ScopeKey::new("admin")]);

        new.request_headers.clear();
        let changed = old.changed_scopes(&new);
        assert!(changed.contains(&ScopeKey::default_scope()));
        assert!(changed.contains(&ScopeKey::new("admin")));
    }
}
