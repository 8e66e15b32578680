//! # graphql-worker
//!
//! Language service adapter for a GraphQL editor worker. The host mirrors
//! its open buffers through a [`TextSource`]; the [`WorkerAdapter`] turns
//! each request into a document snapshot, resolves the schema serving it
//! through the schema cache and delegates to an
//! [`AnalysisEngine`](graphql_ide::AnalysisEngine).
//!
//! ```text
//! host ── Request ──▶ Host ──▶ WorkerAdapter ──▶ SchemaCache ──▶ SchemaTransport
//!                                   │
//!                                   └──▶ AnalysisEngine
//! ```
//!
//! The `graphql-worker` binary speaks the [`host`] protocol over stdio.

mod adapter;
mod error;
pub mod host;
mod logging;
mod source;

pub use adapter::{WorkerAdapter, DEFAULT_LANGUAGE_ID};
pub use error::{AdapterError, Result};
pub use host::{Host, HostError, Request, Response};
pub use logging::init_tracing;
pub use source::{MirrorModel, MirrorModels, TextSource};
