//! Schema retrieval for the GraphQL worker.
//!
//! - [`SchemaTransport`] is the seam through which the schema cache fetches
//!   remote payloads; [`HttpTransport`] is the default implementation.
//! - [`schema_payload_to_sdl`] normalises a payload (SDL or introspection
//!   JSON) to SDL.
//! - [`introspection_to_sdl`] renders a typed introspection result.
//!
//! ```no_run
//! use graphql_introspect::{schema_payload_to_sdl, FetchOptions, HttpTransport, SchemaTransport};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = HttpTransport::new()?;
//! let payload = transport
//!     .fetch_schema_source("https://api.example.com/schema.graphql", &FetchOptions::default())
//!     .await?;
//! let sdl = schema_payload_to_sdl(&payload)?;
//! println!("{sdl}");
//! # Ok(())
//! # }
//! ```

mod error;
mod payload;
mod query;
mod sdl;
mod transport;
mod types;

pub use error::{PayloadError, Result, TransportError};
pub use payload::{introspection_value_to_sdl, schema_payload_to_sdl};
pub use query::INTROSPECTION_QUERY;
pub use sdl::introspection_to_sdl;
pub use transport::{FetchOptions, HttpTransport, SchemaTransport};
pub use types::*;
