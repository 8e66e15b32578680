//! # GraphQL Test Utilities
//!
//! Shared test infrastructure for the GraphQL worker crates.

// Test utilities are less strict than production code
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::needless_raw_string_hashes)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_panics_doc)]
//!
//! ## Modules
//!
//! - [`cursor`] - Cursor position extraction for editor feature tests
//! - [`fixtures`] - Common schema and introspection fixtures
//! - [`transport`] - A scripted schema transport
//!
//! ```
//! use graphql_test_utils::{extract_cursor, fixtures::MINIMAL_SCHEMA};
//!
//! let (source, position) = extract_cursor("{ * }");
//! assert_eq!(source, "{  }");
//! assert_eq!(position.character, 2);
//! assert!(MINIMAL_SCHEMA.contains("Query"));
//! ```

pub mod cursor;
pub mod fixtures;
pub mod transport;

pub use cursor::{extract_cursor, extract_cursors};
pub use transport::{FakeTransport, Gate, RecordedRequest};

pub use graphql_types::Position;
