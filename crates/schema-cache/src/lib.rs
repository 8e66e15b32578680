//! Schema cache for the GraphQL worker.
//!
//! Maps a configuration scope to a built, validated schema. Population is
//! lazy; concurrent requests for one scope share a single fetch; failures are
//! cached as typed [`SchemaError`]s. The transport is injected, so tests run
//! against a deterministic fake.

mod cache;
mod entry;
mod error;

pub use cache::SchemaCache;
pub use entry::{SchemaEntry, SchemaOrigin};
pub use error::{Result, SchemaError};
