use crate::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Default lifetime of a cached schema fetch failure.
pub const DEFAULT_NEGATIVE_CACHE_TTL_MS: u64 = 10_000;

/// Process-wide worker settings.
///
/// Immutable once handed to the worker; a change replaces the whole value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageSettings {
    /// Schema of the `default` scope
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaSource>,

    /// Headers sent with every schema request
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub request_headers: BTreeMap<String, String>,

    /// HTTP method used for schema requests
    #[serde(default)]
    pub request_method: RequestMethod,

    /// Named projects, matched against document paths in name order
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub projects: BTreeMap<String, ProjectSettings>,

    #[serde(default)]
    pub validation_rules: ValidationRules,

    #[serde(default)]
    pub formatting_options: FormattingOptions,

    /// How long a failed remote fetch is remembered before retrying
    #[serde(default = "default_negative_cache_ttl_ms")]
    pub negative_cache_ttl_ms: u64,

    /// When `false`, remote schema URLs are never requested
    #[serde(default = "default_true")]
    pub enable_schema_request: bool,
}

const fn default_negative_cache_ttl_ms() -> u64 {
    DEFAULT_NEGATIVE_CACHE_TTL_MS
}

const fn default_true() -> bool {
    true
}

impl Default for LanguageSettings {
    fn default() -> Self {
        Self {
            schema: None,
            request_headers: BTreeMap::new(),
            request_method: RequestMethod::default(),
            projects: BTreeMap::new(),
            validation_rules: ValidationRules::default(),
            formatting_options: FormattingOptions::default(),
            negative_cache_ttl_ms: DEFAULT_NEGATIVE_CACHE_TTL_MS,
            enable_schema_request: true,
        }
    }
}

impl LanguageSettings {
    /// Settings with a single inline SDL schema.
    #[must_use]
    pub fn with_sdl(sdl: impl Into<String>) -> Self {
        Self {
            schema: Some(SchemaSource::sdl(sdl)),
            ..Self::default()
        }
    }

    /// Settings with a single remote schema.
    #[must_use]
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            schema: Some(SchemaSource::url(url)),
            ..Self::default()
        }
    }

    /// Parse and validate settings from JSON.
    #[tracing::instrument(skip(json), fields(size = json.len()))]
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        tracing::debug!(projects = settings.projects.len(), "Settings loaded");
        Ok(settings)
    }

    /// Parse and validate settings from an already-decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let settings: Self = serde_json::from_value(value)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check project definitions and document patterns.
    pub fn validate(&self) -> Result<()> {
        if let Some(schema) = &self.schema {
            schema.validate("default")?;
        }

        for (name, project) in &self.projects {
            if name.trim().is_empty() {
                return Err(ConfigError::InvalidProject {
                    name: name.clone(),
                    message: "project name is empty".to_string(),
                });
            }
            if name == crate::ScopeKey::DEFAULT {
                return Err(ConfigError::InvalidProject {
                    name: name.clone(),
                    message: "'default' is reserved for the top-level schema".to_string(),
                });
            }
            if project.documents.is_empty() {
                return Err(ConfigError::InvalidProject {
                    name: name.clone(),
                    message: "documents must list at least one pattern".to_string(),
                });
            }
            if let Some(schema) = &project.schema {
                schema.validate(name)?;
            }
        }

        crate::ScopeMatcher::try_new(self)?;
        Ok(())
    }

    /// Negative cache lifetime as a [`Duration`].
    #[must_use]
    pub const fn negative_cache_ttl(&self) -> Duration {
        Duration::from_millis(self.negative_cache_ttl_ms)
    }
}

/// A project: a set of documents sharing one schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettings {
    /// Glob patterns matched against the document URI path
    pub documents: Vec<String>,

    /// Project schema; falls back to the top-level schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaSource>,

    /// Replaces the top-level headers when present
    #[serde(default, alias = "headers", skip_serializing_if = "Option::is_none")]
    pub request_headers: Option<BTreeMap<String, String>>,

    /// Replaces the top-level method when present
    #[serde(default, alias = "method", skip_serializing_if = "Option::is_none")]
    pub request_method: Option<RequestMethod>,
}

/// Where a schema comes from. Exactly one field must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaSource {
    /// Remote endpoint fetched through the schema transport
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Inline SDL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdl: Option<String>,

    /// Inline introspection result (`{ "data": { "__schema": ... } }` or `{ "__schema": ... }`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub introspection: Option<serde_json::Value>,
}

impl SchemaSource {
    #[must_use]
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn sdl(sdl: impl Into<String>) -> Self {
        Self {
            sdl: Some(sdl.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn introspection(value: serde_json::Value) -> Self {
        Self {
            introspection: Some(value),
            ..Self::default()
        }
    }

    fn validate(&self, owner: &str) -> Result<()> {
        let set = [
            self.url.is_some(),
            self.sdl.is_some(),
            self.introspection.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count();

        match set {
            1 => {}
            0 => {
                return Err(ConfigError::InvalidProject {
                    name: owner.to_string(),
                    message: "schema must set one of url, sdl or introspection".to_string(),
                })
            }
            _ => {
                return Err(ConfigError::InvalidProject {
                    name: owner.to_string(),
                    message: "schema sets more than one of url, sdl and introspection"
                        .to_string(),
                })
            }
        }

        if let Some(url) = &self.url {
            if url.trim().is_empty() {
                return Err(ConfigError::InvalidProject {
                    name: owner.to_string(),
                    message: "schema url is empty".to_string(),
                });
            }
        }

        Ok(())
    }
}

/// HTTP method for schema requests.
///
/// `GET` reads the response body as a schema payload; `POST` sends the
/// standard introspection query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestMethod {
    #[default]
    Get,
    Post,
}

impl std::fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
        }
    }
}

/// A named validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationRule {
    /// Executable document validation against the schema
    Spec,
    /// Warn on deprecated fields and enum values
    NoDeprecated,
    /// Warn on operations without a name
    NoAnonymousOperations,
}

/// The set of enabled validation rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationRules(Vec<ValidationRule>);

impl Default for ValidationRules {
    fn default() -> Self {
        Self(vec![ValidationRule::Spec])
    }
}

impl ValidationRules {
    #[must_use]
    pub fn new(rules: impl IntoIterator<Item = ValidationRule>) -> Self {
        let mut deduped = Vec::new();
        for rule in rules {
            if !deduped.contains(&rule) {
                deduped.push(rule);
            }
        }
        Self(deduped)
    }

    #[must_use]
    pub fn contains(&self, rule: ValidationRule) -> bool {
        self.0.contains(&rule)
    }

    pub fn iter(&self) -> impl Iterator<Item = ValidationRule> + '_ {
        self.0.iter().copied()
    }
}

/// Formatting preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormattingOptions {
    pub tab_size: u32,
    pub insert_spaces: bool,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            tab_size: 2,
            insert_spaces: true,
        }
    }
}

impl FormattingOptions {
    /// One level of indentation.
    #[must_use]
    pub fn indent(&self) -> String {
        if self.insert_spaces {
            " ".repeat(self.tab_size.max(1) as usize)
        } else {
            "\t".to_string()
        }
    }
}

/// Expand brace patterns like "src/**/*.{graphql,gql}" into separate patterns
pub(crate) fn expand_braces(pattern: &str) -> Vec<String> {
    if let (Some(start), Some(end)) = (pattern.find('{'), pattern.find('}')) {
        if start < end {
            let before = &pattern[..start];
            let after = &pattern[end + 1..];
            let options = &pattern[start + 1..end];

            return options
                .split(',')
                .map(|opt| format!("{}{}{}", before, opt.trim(), after))
                .collect();
        }
    }

    vec![pattern.to_string()]
}
