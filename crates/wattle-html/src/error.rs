//! Fatal parse errors.
//!
//! Malformed markup is never an error here: it is recovered from and
//! reported as a [`wattle_common::Diagnostic`]. These are the conditions that
//! stop a parse before the end of the input.

use thiserror::Error;

/// A parse that could not run to completion.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HtmlError {
    /// A configured resource cap was exceeded.
    #[error("{what} exceeded the limit of {limit}")]
    ResourceLimit {
        /// Which resource ran out ("open elements" or "nodes").
        what: &'static str,
        /// The configured cap.
        limit: usize,
    },

    /// The cancellation flag was set.
    #[error("parse cancelled")]
    Cancelled,

    /// The fragment context handle does not name an element.
    #[error("invalid fragment context: {0}")]
    InvalidContext(String),
}
