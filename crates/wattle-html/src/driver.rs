//! [§ 13.2.1 Overview of the parsing model](https://html.spec.whatwg.org/multipage/parsing.html#overview-of-the-parsing-model)
//!
//! "The input to the HTML parsing process consists of a stream of code points,
//! which is passed through a tokenization stage followed by a tree
//! construction stage. The output is a Document object."
//!
//! [`HTMLParser`] owns both stages and pulls one token at a time from the
//! tokenizer into the tree builder. State the tree builder needs to change in
//! the tokenizer travels back as an explicit command after each token.

use log::{debug, warn};
use wattle_common::{DiagnosticSink, SourcePosition};
use wattle_dom::QuirksMode;

use crate::config::ParserConfig;
use crate::error::HtmlError;
use crate::parser::{InsertionMode, TreeBuilder};
use crate::sink::TreeSink;
use crate::tokenizer::HTMLTokenizer;

/// The tokenizer and tree builder for one parse.
pub struct HTMLParser<S: TreeSink> {
    tokenizer: HTMLTokenizer,
    builder: TreeBuilder<S>,
    config: ParserConfig,
    tokens_processed: usize,
}

impl<S: TreeSink> HTMLParser<S> {
    /// A parser for a whole document, writing into `sink`.
    #[must_use]
    pub fn new(input: &str, sink: S, config: ParserConfig) -> Self {
        let builder = TreeBuilder::new(sink, &config);
        Self {
            tokenizer: HTMLTokenizer::new(input),
            builder,
            config,
            tokens_processed: 0,
        }
    }

    /// [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
    ///
    /// A parser for `input` as if it were the contents of `context`, an
    /// element already in `sink`.
    ///
    /// # Errors
    ///
    /// [`HtmlError::InvalidContext`] when `context` is not an element.
    pub fn new_fragment(
        input: &str,
        sink: S,
        context: S::Handle,
        config: ParserConfig,
    ) -> Result<Self, HtmlError> {
        let mut builder = TreeBuilder::new_for_fragment(sink, context, &config)?;
        let mut tokenizer = HTMLTokenizer::new(input);

        // The context element counts as the last start tag, so a `title`
        // context's RCDATA ends at `</title>`.
        tokenizer.set_last_start_tag(builder.context_name());
        if let Some(state) = builder.take_tokenizer_state() {
            tokenizer.switch_to(state);
        }

        Ok(Self {
            tokenizer,
            builder,
            config,
            tokens_processed: 0,
        })
    }

    /// Run both stages to the end of the input, reporting every parse error
    /// to `diagnostics` in the order it was detected.
    ///
    /// # Errors
    ///
    /// [`HtmlError::ResourceLimit`] when a configured cap is exceeded, and
    /// [`HtmlError::Cancelled`] when the cancellation flag is observed.
    pub fn run(&mut self, diagnostics: &mut dyn DiagnosticSink) -> Result<(), HtmlError> {
        loop {
            if self.config.is_cancelled() {
                warn!("parse cancelled after {} tokens", self.tokens_processed);
                return Err(HtmlError::Cancelled);
            }

            // "if there is an adjusted current node and it is not an element in
            // the HTML namespace"
            self.tokenizer.set_cdata_allowed(self.builder.cdata_allowed());

            let token = self.tokenizer.next_token();
            for diagnostic in self.tokenizer.take_diagnostics() {
                diagnostics.report(diagnostic);
            }

            self.builder.set_position(self.tokenizer.current_position());
            self.builder.process_token(&token);
            self.tokens_processed += 1;

            if let Some(state) = self.builder.take_tokenizer_state() {
                self.tokenizer.switch_to(state);
            }
            for diagnostic in self.builder.take_diagnostics() {
                diagnostics.report(diagnostic);
            }

            if let Some(error) = self.builder.take_fatal() {
                warn!("parse aborted: {error}");
                return Err(error);
            }

            if token.is_eof() || self.builder.is_stopped() {
                debug!(
                    "parse finished after {} tokens in {} mode",
                    self.tokens_processed,
                    self.builder.mode()
                );
                return Ok(());
            }
        }
    }

    /// The insertion mode the tree builder is in.
    #[must_use]
    pub const fn mode(&self) -> InsertionMode {
        self.builder.mode()
    }

    /// The document's quirks mode as determined so far.
    #[must_use]
    pub const fn quirks_mode(&self) -> QuirksMode {
        self.builder.quirks_mode()
    }

    /// Position of the last character the tokenizer consumed.
    #[must_use]
    pub fn position(&self) -> SourcePosition {
        self.tokenizer.current_position()
    }

    /// The tree builder, for inspecting the sink mid-parse.
    #[must_use]
    pub const fn builder(&self) -> &TreeBuilder<S> {
        &self.builder
    }

    /// Give up the parser and keep the tree builder (and with it the sink).
    #[must_use]
    pub fn into_builder(self) -> TreeBuilder<S> {
        self.builder
    }
}
