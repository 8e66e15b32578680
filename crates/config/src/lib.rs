//! Language settings for the GraphQL worker.
//!
//! [`LanguageSettings`] is the JSON object the host hands to the worker at
//! start-up (and again on `reconfigure`). It names where schemas come from,
//! which documents belong to which project, and how validation and
//! formatting behave. [`ScopeMatcher::scope_for`] maps a document to the
//! schema scope that serves it.

mod error;
mod scope;
mod settings;

pub use error::{ConfigError, Result};
pub use scope::{ResolvedSource, ScopeConfig, ScopeKey, ScopeMatcher};
pub use settings::{
    FormattingOptions, LanguageSettings, ProjectSettings, RequestMethod, SchemaSource,
    ValidationRule, ValidationRules, DEFAULT_NEGATIVE_CACHE_TTL_MS,
};
