//! Common utilities for the Wattle HTML parser.
//!
//! This crate provides shared infrastructure used by every parser component:
//! - **Diagnostics** - parse error kinds, source positions and the sink trait
//!   that the tokenizer and tree builder report through
//! - **Warning System** - colored, deduplicated terminal output of diagnostics

pub mod diagnostics;
pub mod warning;

pub use diagnostics::{Diagnostic, DiagnosticSink, ParseErrorKind, SourcePosition};
