//! JSON-lines host protocol.
//!
//! Each line on stdin is one [`Request`]; each response is one line on
//! stdout. Buffer updates (`didOpen`, `didChange`, `didClose`) are applied in
//! arrival order. Analysis requests may answer out of order and are matched
//! to their request by `id`.

use std::sync::Arc;

use graphql_config::{ConfigError, FormattingOptions, LanguageSettings, ScopeKey};
use graphql_ide::CompletionItem;
use graphql_types::{DocumentUri, Position, Range};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::adapter::WorkerAdapter;
use crate::error::AdapterError;
use crate::source::{MirrorModel, MirrorModels};

/// Request methods understood by [`Host::handle`].
pub mod methods {
    pub const INITIALIZE: &str = "initialize";
    pub const DID_OPEN: &str = "didOpen";
    pub const DID_CHANGE: &str = "didChange";
    pub const DID_CLOSE: &str = "didClose";
    pub const VALIDATE: &str = "validate";
    pub const COMPLETE: &str = "complete";
    pub const RESOLVE: &str = "resolve";
    pub const HOVER: &str = "hover";
    pub const FORMAT: &str = "format";
    pub const RELOAD_SCHEMA: &str = "reloadSchema";
    pub const DOCUMENT_SYMBOLS: &str = "documentSymbols";
    pub const RECONFIGURE: &str = "reconfigure";
    pub const SHUTDOWN: &str = "shutdown";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

impl Request {
    /// Buffer updates must be applied before any later request is served.
    #[must_use]
    pub fn is_buffer_update(&self) -> bool {
        matches!(
            self.method.as_str(),
            methods::DID_OPEN | methods::DID_CHANGE | methods::DID_CLOSE
        )
    }

    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        self.method == methods::SHUTDOWN
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub id: Value,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    Result(Value),
    Error(ResponseError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseError {
    pub code: String,
    pub message: String,
}

impl Response {
    #[must_use]
    pub const fn ok(id: Value, result: Value) -> Self {
        Self {
            id,
            outcome: Outcome::Result(result),
        }
    }

    #[must_use]
    pub fn error(id: Value, error: &HostError) -> Self {
        Self {
            id,
            outcome: Outcome::Error(ResponseError {
                code: error.code().to_string(),
                message: error.to_string(),
            }),
        }
    }

    /// Response to a line that is not a valid request.
    #[must_use]
    pub fn malformed(error: &serde_json::Error) -> Self {
        Self::error(Value::Null, &HostError::Malformed(error.to_string()))
    }
}

#[derive(Debug, Error)]
pub enum HostError {
    #[error("Malformed request: {0}")]
    Malformed(String),

    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    #[error("Invalid params for {method}: {source}")]
    InvalidParams {
        method: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Adapter(#[from] AdapterError),
}

impl HostError {
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "malformed-request",
            Self::UnknownMethod(_) => "unknown-method",
            Self::InvalidParams { .. } => "invalid-params",
            Self::Encode(_) => "internal-error",
            Self::Config(_) => "invalid-settings",
            Self::Adapter(e) => e.code(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UriParams {
    uri: DocumentUri,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PositionParams {
    uri: DocumentUri,
    position: Position,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FormatParams {
    uri: DocumentUri,
    range: Range,
    #[serde(default)]
    options: Option<FormattingOptions>,
}

/// Answers host requests against one adapter and its mirror set.
#[derive(Debug, Clone)]
pub struct Host {
    adapter: Arc<WorkerAdapter>,
    models: Arc<MirrorModels>,
}

impl Host {
    #[must_use]
    pub const fn new(adapter: Arc<WorkerAdapter>, models: Arc<MirrorModels>) -> Self {
        Self { adapter, models }
    }

    #[must_use]
    pub fn adapter(&self) -> &WorkerAdapter {
        &self.adapter
    }

    /// Serve one request. Failures are reported in the response, never
    /// returned.
    #[tracing::instrument(skip(self, request), fields(method = %request.method))]
    pub async fn handle(&self, request: Request) -> Response {
        let Request { id, method, params } = request;
        match self.dispatch(&method, params).await {
            Ok(result) => Response::ok(id, result),
            Err(error) => {
                tracing::warn!(error = %error, "Request failed");
                Response::error(id, &error)
            }
        }
    }

    async fn dispatch(&self, method: &str, params: Value) -> Result<Value, HostError> {
        match method {
            methods::INITIALIZE | methods::RECONFIGURE => {
                let settings = if params.is_null() {
                    LanguageSettings::default()
                } else {
                    LanguageSettings::from_value(params)?
                };
                let evicted = self.adapter.reconfigure(settings);
                if method == methods::INITIALIZE {
                    Ok(serde_json::json!({
                        "name": env!("CARGO_PKG_NAME"),
                        "version": env!("CARGO_PKG_VERSION"),
                    }))
                } else {
                    let evicted: Vec<&str> = evicted.iter().map(ScopeKey::as_str).collect();
                    to_value(&evicted)
                }
            }
            methods::DID_OPEN => {
                let model: MirrorModel = parse(method, params)?;
                self.models.open(model);
                Ok(Value::Null)
            }
            methods::DID_CHANGE => {
                let model: MirrorModel = parse(method, params)?;
                Ok(Value::Bool(self.models.change(model)))
            }
            methods::DID_CLOSE => {
                let UriParams { uri } = parse(method, params)?;
                Ok(Value::Bool(self.models.close(&uri)))
            }
            methods::VALIDATE => {
                let UriParams { uri } = parse(method, params)?;
                to_value(&self.adapter.validate(&uri).await)
            }
            methods::COMPLETE => {
                let PositionParams { uri, position } = parse(method, params)?;
                to_value(&self.adapter.complete(&uri, position).await?)
            }
            methods::RESOLVE => {
                let item: CompletionItem = parse(method, params)?;
                to_value(&self.adapter.resolve_completion_item(item))
            }
            methods::HOVER => {
                let PositionParams { uri, position } = parse(method, params)?;
                to_value(&self.adapter.hover(&uri, position).await)
            }
            methods::FORMAT => {
                let FormatParams {
                    uri,
                    range,
                    options,
                } = parse(method, params)?;
                to_value(&self.adapter.format(&uri, range, options))
            }
            methods::RELOAD_SCHEMA => {
                let UriParams { uri } = parse(method, params)?;
                Ok(Value::Bool(self.adapter.reload_schema(&uri).await))
            }
            methods::DOCUMENT_SYMBOLS => {
                let UriParams { uri } = parse(method, params)?;
                to_value(&self.adapter.document_symbols(&uri))
            }
            methods::SHUTDOWN => Ok(Value::Null),
            other => Err(HostError::UnknownMethod(other.to_string())),
        }
    }
}

fn parse<T: DeserializeOwned>(method: &str, params: Value) -> Result<T, HostError> {
    serde_json::from_value(params).map_err(|source| HostError::InvalidParams {
        method: method.to_string(),
        source,
    })
}

fn to_value<T: Serialize>(value: &T) -> Result<Value, HostError> {
    Ok(serde_json::to_value(value)?)
}
