//! HTML tokenizer and tree builder.
//!
//! # Scope
//!
//! This crate implements:
//! - **Input stream** ([WHATWG § 13.2.3.5](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream))
//!   - Newline normalization and input stream parse errors
//!   - Line/column tracking for diagnostics
//!
//! - **HTML Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - Every tokenizer state, including script data escapes and CDATA sections
//!   - Named, legacy and numeric character references
//!
//! - **Tree Builder** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - All 23 insertion modes
//!   - Adoption agency algorithm, foster parenting, Noah's Ark clause
//!   - SVG and MathML foreign content
//!   - Quirks mode detection
//!
//! - **Fragment parsing** ([WHATWG § 13.4](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments))
//!
//! The tree builder writes through the [`TreeSink`] trait. [`DomTree`] is the
//! default sink.
//!
//! # Not Implemented
//!
//! - Script execution (the parser never pauses for scripts)
//! - Form owner association
//! - Byte stream decoding (input is already a `&str`)
//! - `<isindex>` rewriting (it parses as an ordinary element)

/// Parser configuration.
pub mod config;
/// The tokenizer/tree builder driver.
pub mod driver;
/// Fatal parse errors.
pub mod error;
/// Tree construction.
pub mod parser;
/// The node-tree interface and its [`DomTree`] implementation.
pub mod sink;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

use wattle_common::{Diagnostic, DiagnosticSink};
pub use wattle_dom::{DomTree, Namespace, NodeId, QuirksMode};

pub use config::ParserConfig;
pub use driver::HTMLParser;
pub use error::HtmlError;
pub use parser::{InsertionMode, TreeBuilder};
pub use sink::{TreeSink, print_tree, tree_to_string};
pub use tokenizer::{Attribute, HTMLTokenizer, Token, TokenizerState};

/// The result of parsing a whole document.
#[derive(Debug)]
pub struct ParsedDocument<S: TreeSink> {
    /// The sink the tree was built in.
    pub sink: S,
    /// The Document node.
    pub root: S::Handle,
    /// The quirks mode picked from the DOCTYPE.
    pub quirks_mode: QuirksMode,
}

/// The result of parsing a fragment.
#[derive(Debug)]
pub struct ParsedFragment<S: TreeSink> {
    /// The sink the nodes were built in.
    pub sink: S,
    /// The top-level nodes of the fragment, in tree order. They have no
    /// parent.
    pub nodes: Vec<S::Handle>,
}

/// [§ 13.2 Parsing HTML documents](https://html.spec.whatwg.org/multipage/parsing.html#parsing)
///
/// Parse `input` as a complete document into `sink`.
///
/// # Errors
///
/// Only when a resource cap is exceeded or the parse is cancelled. Malformed
/// markup is recovered from and reported to `diagnostics`.
pub fn parse_document<S: TreeSink>(
    input: &str,
    sink: S,
    config: &ParserConfig,
    diagnostics: &mut dyn DiagnosticSink,
) -> Result<ParsedDocument<S>, HtmlError> {
    let mut parser = HTMLParser::new(input, sink, config.clone());
    parser.run(diagnostics)?;
    let quirks_mode = parser.quirks_mode();
    let sink = parser.into_builder().into_sink();
    let root = sink.document();
    Ok(ParsedDocument {
        sink,
        root,
        quirks_mode,
    })
}

/// [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
///
/// Parse `input` as the contents of `context`, an element in `sink`.
///
/// # Errors
///
/// [`HtmlError::InvalidContext`] when `context` is not an element, and the
/// same resource and cancellation errors as [`parse_document`].
pub fn parse_fragment<S: TreeSink>(
    input: &str,
    sink: S,
    context: S::Handle,
    config: &ParserConfig,
    diagnostics: &mut dyn DiagnosticSink,
) -> Result<ParsedFragment<S>, HtmlError> {
    let mut parser = HTMLParser::new_fragment(input, sink, context, config.clone())?;
    parser.run(diagnostics)?;
    let builder = parser.into_builder();
    let root = builder.fragment_root();
    let mut sink = builder.into_sink();

    // "Return the child nodes of root, in tree order."
    let nodes = root.map(|root| sink.children(root)).unwrap_or_default();
    for &node in &nodes {
        sink.remove(node);
    }
    Ok(ParsedFragment { sink, nodes })
}

/// Parse a document into a fresh [`DomTree`] with the default config.
///
/// # Errors
///
/// Only when the default resource caps are exceeded.
pub fn parse_html(input: &str) -> Result<(ParsedDocument<DomTree>, Vec<Diagnostic>), HtmlError> {
    let mut diagnostics = Vec::new();
    let document = parse_document(input, DomTree::new(), &ParserConfig::default(), &mut diagnostics)?;
    Ok((document, diagnostics))
}

/// Parse a fragment into a fresh [`DomTree`] with the default config, as the
/// contents of a detached HTML element named `context_tag`.
///
/// # Errors
///
/// Only when the default resource caps are exceeded.
pub fn parse_html_fragment(
    input: &str,
    context_tag: &str,
) -> Result<(ParsedFragment<DomTree>, Vec<Diagnostic>), HtmlError> {
    let mut tree = DomTree::new();
    let context = tree.alloc_element(&context_tag.to_ascii_lowercase(), Namespace::Html, Vec::new());
    let mut diagnostics = Vec::new();
    let fragment = parse_fragment(input, tree, context, &ParserConfig::default(), &mut diagnostics)?;
    Ok((fragment, diagnostics))
}
