//! Parser configuration.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Deserialize;

/// Default cap on the depth of the stack of open elements.
pub const DEFAULT_MAX_OPEN_ELEMENTS: usize = 4096;

/// Default cap on the number of nodes the tree builder may create.
pub const DEFAULT_MAX_NODES: usize = 1_000_000;

/// Knobs for a single parse.
///
/// Every field has a default, so a partial TOML or JSON table deserializes
/// into a usable config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// [§ 13.2.4.5 Other parsing state flags](https://html.spec.whatwg.org/multipage/parsing.html#scripting-flag)
    ///
    /// "The scripting flag is set to "enabled" if scripting was enabled for
    /// the Document with which the parser is associated when the parser was
    /// created, and "disabled" otherwise."
    pub scripting: bool,

    /// Whether the document is an iframe srcdoc document. Such documents
    /// never fall into quirks mode for a missing DOCTYPE.
    pub iframe_srcdoc: bool,

    /// Depth at which the stack of open elements is considered runaway.
    pub max_open_elements: usize,

    /// Number of created nodes at which the parse is aborted.
    pub max_nodes: usize,

    /// Attach a detail string (tag name, insertion mode) to each diagnostic.
    pub exact_errors: bool,

    /// Cooperative cancellation, checked once per token.
    #[serde(skip)]
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            scripting: false,
            iframe_srcdoc: false,
            max_open_elements: DEFAULT_MAX_OPEN_ELEMENTS,
            max_nodes: DEFAULT_MAX_NODES,
            exact_errors: false,
            cancel: None,
        }
    }
}

impl ParserConfig {
    /// Set the scripting flag.
    #[must_use]
    pub const fn with_scripting(mut self, scripting: bool) -> Self {
        self.scripting = scripting;
        self
    }

    /// Mark the input as an iframe srcdoc document.
    #[must_use]
    pub const fn with_iframe_srcdoc(mut self, iframe_srcdoc: bool) -> Self {
        self.iframe_srcdoc = iframe_srcdoc;
        self
    }

    /// Cap the depth of the stack of open elements.
    #[must_use]
    pub const fn with_max_open_elements(mut self, max: usize) -> Self {
        self.max_open_elements = max;
        self
    }

    /// Cap the number of created nodes.
    #[must_use]
    pub const fn with_max_nodes(mut self, max: usize) -> Self {
        self.max_nodes = max;
        self
    }

    /// Attach detail strings to diagnostics.
    #[must_use]
    pub const fn with_exact_errors(mut self, exact_errors: bool) -> Self {
        self.exact_errors = exact_errors;
        self
    }

    /// Install a cancellation flag. Setting it to `true` from any thread makes
    /// the parse stop with [`crate::HtmlError::Cancelled`] at the next token.
    #[must_use]
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}
