//! Core types shared by every yangtree layer.
//!
//! This crate provides:
//! - [`Error`] - Rich error types with a closed [`ErrorCode`]
//! - [`Span`] - Source locations for diagnostics
//! - [`Diagnostic`] and [`DiagnosticSink`] - Location-tagged reporting
//! - [`Revision`] - Revision dates and their normalization

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod diagnostic;
pub mod error;
pub mod revision;
pub mod span;

pub use diagnostic::{Diagnostic, DiagnosticSink, MemorySink, Severity, TracingSink};
pub use error::{Error, ErrorCode, ErrorContext, ErrorKind, Result};
pub use revision::{Revision, check_date, is_newer, sort_revisions};
pub use span::Span;
