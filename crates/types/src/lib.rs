//! Foundation types for the GraphQL worker.
//!
//! This crate provides the value types shared by every layer of the worker:
//! the host-facing document snapshot, editor coordinates, and severities.
//! Everything here is plain data and serialises to the camelCase JSON shape
//! editors speak.
//!
//! # Type Categories
//!
//! - **Document types**: [`DocumentUri`], [`Document`]
//! - **Position types**: [`Position`], [`Range`], [`OffsetRange`]
//! - **Severity types**: [`DiagnosticSeverity`]
//! - **Edit types**: [`TextEdit`]

mod document;
mod edits;
mod position;
mod severity;

pub use document::{Document, DocumentUri};
pub use edits::TextEdit;
pub use position::{OffsetRange, Position, Range};
pub use severity::DiagnosticSeverity;
