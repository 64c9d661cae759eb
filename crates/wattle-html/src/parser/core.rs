use log::{trace, warn};
use strum_macros::Display;
use wattle_common::{Diagnostic, ParseErrorKind, SourcePosition};
use wattle_dom::{Attribute, Namespace, QuirksMode};

use super::foreign_content::mathml;
use super::formatting::ActiveFormattingElements;
use super::stack::{Scope, StackOfOpenElements, is_html_named, is_html_one_of};
use crate::config::ParserConfig;
use crate::error::HtmlError;
use crate::sink::TreeSink;
use crate::tokenizer::{Token, TokenizerState};

/// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
///
/// "The insertion mode is a state variable that controls the primary operation
/// of the tree construction stage."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum InsertionMode {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    Initial,
    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    BeforeHtml,
    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    BeforeHead,
    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    InHead,
    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    InHeadNoscript,
    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    AfterHead,
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    InBody,
    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    Text,
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    InTable,
    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    InTableText,
    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    InCaption,
    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolgroup)
    InColumnGroup,
    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intbody)
    InTableBody,
    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intr)
    InRow,
    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intd)
    InCell,
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    InSelect,
    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    InSelectInTable,
    /// [§ 13.2.6.4.18 The "in template" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)
    InTemplate,
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    AfterBody,
    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    InFrameset,
    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    AfterFrameset,
    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    AfterAfterBody,
    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    AfterAfterFrameset,
}

/// What the dispatcher does after a handler returns.
///
/// "Reprocess the token" goes back through the tree construction dispatcher
/// with the (possibly changed) insertion mode. "Process the token using the
/// rules for" another mode runs that mode's handler directly, leaving the
/// current insertion mode alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProcessResult {
    Done,
    Reprocess,
    ReprocessUsing(InsertionMode),
}

/// [§ 13.2.6.1 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
///
/// "The adjusted insertion location": either after the last child of a
/// node, or just before a node (foster parenting before a table).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InsertionPoint<H> {
    LastChildOf(H),
    BeforeSibling(H),
}

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
///
/// The tree construction stage: consumes tokens one at a time and drives a
/// [`TreeSink`]. The tokenizer is not owned here; state changes for it are
/// queued as a command the driver picks up with
/// [`TreeBuilder::take_tokenizer_state`].
pub struct TreeBuilder<S: TreeSink> {
    pub(super) sink: S,

    /// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
    pub(super) mode: InsertionMode,

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#original-insertion-mode)
    ///
    /// "the original insertion mode", used by the "text" and "in table text"
    /// modes to return to where they came from.
    pub(super) original_mode: Option<InsertionMode>,

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#stack-of-template-insertion-modes)
    pub(super) template_modes: Vec<InsertionMode>,

    /// [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    pub(super) open_elements: StackOfOpenElements<S::Handle>,

    /// [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
    pub(super) active_formatting: ActiveFormattingElements<S::Handle>,

    /// [§ 13.2.4.4 The element pointers](https://html.spec.whatwg.org/multipage/parsing.html#the-element-pointers)
    pub(super) head_element: Option<S::Handle>,
    pub(super) form_element: Option<S::Handle>,

    /// The context element in the fragment case.
    pub(super) context_element: Option<S::Handle>,
    /// The synthetic `html` root that collects the fragment's nodes.
    pub(super) fragment_root: Option<S::Handle>,

    /// [§ 13.2.4.5 Other parsing state flags](https://html.spec.whatwg.org/multipage/parsing.html#frameset-ok-flag)
    pub(super) frameset_ok: bool,
    pub(super) scripting: bool,
    pub(super) iframe_srcdoc: bool,

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    pub(super) foster_parenting: bool,

    pub(super) quirks_mode: QuirksMode,

    /// [§ 13.2.6.4.10](https://html.spec.whatwg.org/multipage/parsing.html#concept-pending-table-char-tokens)
    ///
    /// "the pending table character tokens list"
    pub(super) pending_table_text: Vec<char>,

    /// Set after `<pre>`, `<listing>` and `<textarea>`: "If the next token is a
    /// U+000A LINE FEED (LF) character token, then ignore that token and move
    /// on to the next one."
    pub(super) ignore_next_lf: bool,

    /// "acknowledge the token's self-closing flag"
    pub(super) self_closing_acknowledged: bool,

    pub(super) stopped: bool,

    tokenizer_command: Option<TokenizerState>,
    diagnostics: Vec<Diagnostic>,
    position: SourcePosition,
    exact_errors: bool,
    max_open_elements: usize,
    max_nodes: usize,
    nodes_created: usize,
    fatal: Option<HtmlError>,
}

impl<S: TreeSink> TreeBuilder<S> {
    /// A tree builder for a whole document, starting in the "initial" mode.
    #[must_use]
    pub fn new(sink: S, config: &ParserConfig) -> Self {
        Self {
            sink,
            mode: InsertionMode::Initial,
            original_mode: None,
            template_modes: Vec::new(),
            open_elements: StackOfOpenElements::new(),
            active_formatting: ActiveFormattingElements::new(),
            head_element: None,
            form_element: None,
            context_element: None,
            fragment_root: None,
            frameset_ok: true,
            scripting: config.scripting,
            iframe_srcdoc: config.iframe_srcdoc,
            foster_parenting: false,
            quirks_mode: QuirksMode::NoQuirks,
            pending_table_text: Vec::new(),
            ignore_next_lf: false,
            self_closing_acknowledged: false,
            stopped: false,
            tokenizer_command: None,
            diagnostics: Vec::new(),
            position: SourcePosition::default(),
            exact_errors: config.exact_errors,
            max_open_elements: config.max_open_elements,
            max_nodes: config.max_nodes,
            nodes_created: 0,
            fatal: None,
        }
    }

    /// [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
    ///
    /// A tree builder seeded for the fragment case. The tokenizer state the
    /// context element calls for is queued as a tokenizer command.
    ///
    /// # Errors
    ///
    /// [`HtmlError::InvalidContext`] when `context` is not an element.
    pub fn new_for_fragment(
        sink: S,
        context: S::Handle,
        config: &ParserConfig,
    ) -> Result<Self, HtmlError> {
        let mut builder = Self::new(sink, config);
        let Some((namespace, context_name)) = builder.sink.element_name(context) else {
            return Err(HtmlError::InvalidContext(format!("{context:?} is not an element")));
        };
        let context_name = context_name.to_string();

        // "Set the state of the HTML parser's tokenization stage as follows,
        // switching on the context element:"
        if namespace == Namespace::Html {
            let state = match context_name.as_str() {
                "title" | "textarea" => Some(TokenizerState::RCDATA),
                "style" | "xmp" | "iframe" | "noembed" | "noframes" => {
                    Some(TokenizerState::RAWTEXT)
                }
                "script" => Some(TokenizerState::ScriptData),
                "noscript" if builder.scripting => Some(TokenizerState::RAWTEXT),
                "plaintext" => Some(TokenizerState::PLAINTEXT),
                _ => None,
            };
            if let Some(state) = state {
                builder.switch_tokenizer_to(state);
            }
        }

        // "Let root be the result of creating an element given document, "html",
        // and the HTML namespace. Append the element root to the Document node
        // created above. Set up the parser's stack of open elements so that it
        // contains just the single element root."
        let root = builder.create_element("html", Namespace::Html, Vec::new());
        let document = builder.sink.document();
        builder.sink.append_child(document, root);
        builder.push_open_element(root);
        builder.fragment_root = Some(root);
        builder.context_element = Some(context);

        // "If the context element is a template element, then push "in template"
        // onto the stack of template insertion modes so that it is the new
        // current template insertion mode."
        if namespace == Namespace::Html && context_name == "template" {
            builder.template_modes.push(InsertionMode::InTemplate);
        }

        // "Reset the parser's insertion mode appropriately."
        builder.reset_insertion_mode_appropriately();

        // "Set the HTML parser's form element pointer to the nearest node to the
        // context element that is a form element (going straight up the
        // ancestor chain, and including the element itself, if it is a form
        // element), if any."
        let mut node = Some(context);
        while let Some(current) = node {
            if is_html_named(&builder.sink, current, "form") {
                builder.form_element = Some(current);
                break;
            }
            node = builder.sink.parent(current);
        }

        builder.frameset_ok = false;
        Ok(builder)
    }

    // =========================================================================
    // Driver interface
    // =========================================================================

    /// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction-dispatcher)
    ///
    /// "As each token is emitted from the tokenizer, the user agent must follow
    /// the appropriate steps from the following list, known as the tree
    /// construction dispatcher"
    ///
    /// Reprocessing is a loop over the same token, never recursion.
    pub fn process_token(&mut self, token: &Token) {
        if self.stopped {
            return;
        }
        if core::mem::take(&mut self.ignore_next_lf) && matches!(token, Token::Character { data: '\n' }) {
            return;
        }
        self.self_closing_acknowledged = false;

        let mut using: Option<InsertionMode> = None;
        loop {
            let result = match using.take() {
                Some(mode) => self.process_using_mode(mode, token),
                None if self.use_foreign_content_rules(token) => self.process_foreign_content(token),
                None => self.process_using_mode(self.mode, token),
            };
            match result {
                ProcessResult::Done => break,
                ProcessResult::Reprocess => {}
                ProcessResult::ReprocessUsing(mode) => using = Some(mode),
            }
        }

        // "When a start tag token is emitted with its self-closing flag set, if
        // the flag is not acknowledged when the token is processed by the tree
        // construction stage, that is a non-void-html-element-start-tag-with-trailing-solidus
        // parse error."
        if let Token::StartTag {
            self_closing: true, ..
        } = token
            && !self.self_closing_acknowledged
        {
            self.parse_error(ParseErrorKind::NonVoidHtmlElementStartTagWithTrailingSolidus, token);
        }
    }

    /// Record where the token being processed ends, for diagnostics.
    pub const fn set_position(&mut self, position: SourcePosition) {
        self.position = position;
    }

    /// Tree construction diagnostics produced since the last call.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        core::mem::take(&mut self.diagnostics)
    }

    /// A tokenizer state change requested while processing the last token.
    pub const fn take_tokenizer_state(&mut self) -> Option<TokenizerState> {
        self.tokenizer_command.take()
    }

    /// A resource limit hit while processing the last token.
    pub const fn take_fatal(&mut self) -> Option<HtmlError> {
        self.fatal.take()
    }

    /// Whether the tokenizer may open a CDATA section: "if there is an
    /// adjusted current node and it is not an element in the HTML namespace".
    #[must_use]
    pub fn cdata_allowed(&self) -> bool {
        self.adjusted_current_node()
            .and_then(|node| self.sink.element_name(node))
            .is_some_and(|(namespace, _)| namespace != Namespace::Html)
    }

    /// Name of the context element in the fragment case, for seeding the
    /// tokenizer's "last start tag".
    #[must_use]
    pub fn context_name(&self) -> Option<&str> {
        let context = self.context_element?;
        match self.sink.element_name(context) {
            Some((Namespace::Html, name)) => Some(name),
            _ => None,
        }
    }

    /// The current insertion mode.
    #[must_use]
    pub const fn mode(&self) -> InsertionMode {
        self.mode
    }

    /// The document's quirks mode as determined so far.
    #[must_use]
    pub const fn quirks_mode(&self) -> QuirksMode {
        self.quirks_mode
    }

    /// Whether parsing has stopped.
    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// The synthetic root element in the fragment case.
    #[must_use]
    pub const fn fragment_root(&self) -> Option<S::Handle> {
        self.fragment_root
    }

    /// The sink being built.
    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Give the sink back.
    #[must_use]
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// [§ 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction-dispatcher)
    ///
    /// Whether the dispatcher picks the rules for parsing tokens in foreign
    /// content for this token.
    fn use_foreign_content_rules(&self, token: &Token) -> bool {
        // "If the stack of open elements is empty"
        let Some(node) = self.adjusted_current_node() else {
            return false;
        };
        let Some((namespace, name)) = self.sink.element_name(node) else {
            return false;
        };
        // "If the adjusted current node is an element in the HTML namespace"
        if namespace == Namespace::Html {
            return false;
        }
        // "If the token is an end-of-file token"
        if token.is_eof() {
            return false;
        }

        let is_start_tag = matches!(token, Token::StartTag { .. });
        let is_character = matches!(token, Token::Character { .. });

        if namespace == Namespace::MathMl && mathml::is_text_integration_point(name) {
            // "If the adjusted current node is a MathML text integration point
            // and the token is a start tag whose tag name is neither "mglyph"
            // nor "malignmark""
            if is_start_tag && !matches!(token.tag_name(), Some("mglyph" | "malignmark")) {
                return false;
            }
            // "If the adjusted current node is a MathML text integration point
            // and the token is a character token"
            if is_character {
                return false;
            }
        }

        // "If the adjusted current node is a MathML annotation-xml element and
        // the token is a start tag whose tag name is "svg""
        if namespace == Namespace::MathMl && name == "annotation-xml" && token.is_start_tag("svg") {
            return false;
        }

        // "If the adjusted current node is an HTML integration point and the
        // token is a start tag" / "... and the token is a character token"
        if (is_start_tag || is_character) && self.is_html_integration_point(node) {
            return false;
        }

        true
    }

    /// [§ 13.2.6.2](https://html.spec.whatwg.org/multipage/parsing.html#html-integration-point)
    ///
    /// "A node is an HTML integration point if it is one of the following
    /// elements: A MathML annotation-xml element whose start tag token had an
    /// attribute with the name "encoding" whose value was an ASCII
    /// case-insensitive match for the string "text/html"; ... for the string
    /// "application/xhtml+xml"; An SVG foreignObject element; An SVG desc
    /// element; An SVG title element"
    pub(super) fn is_html_integration_point(&self, node: S::Handle) -> bool {
        match self.sink.element_name(node) {
            Some((Namespace::MathMl, "annotation-xml")) => {
                mathml::is_annotation_xml_integration_point(self.sink.attributes(node))
            }
            Some((Namespace::Svg, name)) => matches!(name, "foreignObject" | "desc" | "title"),
            _ => false,
        }
    }

    /// A MathML text integration point (mi, mo, mn, ms, mtext).
    pub(super) fn is_mathml_text_integration_point(&self, node: S::Handle) -> bool {
        matches!(
            self.sink.element_name(node),
            Some((Namespace::MathMl, name)) if mathml::is_text_integration_point(name)
        )
    }

    // =========================================================================
    // Parse errors, mode switches, tokenizer commands, limits
    // =========================================================================

    /// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
    ///
    /// Report a tree construction error for `token`. The detail string (token
    /// and insertion mode) is only built when exact errors are requested.
    pub(super) fn parse_error(&mut self, kind: ParseErrorKind, token: &Token) {
        let mut diagnostic = Diagnostic::new(kind, self.position);
        if self.exact_errors {
            diagnostic = diagnostic.with_detail(format!("{token} in {} mode", self.mode));
        }
        self.diagnostics.push(diagnostic);
    }

    /// "Switch the insertion mode to X"
    pub(super) fn switch_mode(&mut self, mode: InsertionMode) {
        if self.mode != mode {
            trace!("insertion mode {} -> {mode}", self.mode);
        }
        self.mode = mode;
    }

    /// "Switch the tokenizer to the X state"
    pub(super) fn switch_tokenizer_to(&mut self, state: TokenizerState) {
        trace!("tokenizer state -> {state}");
        self.tokenizer_command = Some(state);
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#acknowledge-self-closing-flag)
    pub(super) const fn acknowledge_self_closing_flag(&mut self) {
        self.self_closing_acknowledged = true;
    }

    pub(super) fn count_node(&mut self) {
        self.nodes_created += 1;
        if self.nodes_created > self.max_nodes && self.fatal.is_none() {
            warn!("node limit of {} reached", self.max_nodes);
            self.fatal = Some(HtmlError::ResourceLimit {
                what: "nodes",
                limit: self.max_nodes,
            });
        }
    }

    /// "Push the element onto the stack of open elements"
    pub(super) fn push_open_element(&mut self, element: S::Handle) {
        self.open_elements.push(element);
        if self.open_elements.len() > self.max_open_elements && self.fatal.is_none() {
            warn!("open element limit of {} reached", self.max_open_elements);
            self.fatal = Some(HtmlError::ResourceLimit {
                what: "open elements",
                limit: self.max_open_elements,
            });
        }
    }

    /// "Pop the current node off the stack of open elements"
    pub(super) fn pop_current(&mut self) -> Option<S::Handle> {
        self.open_elements.pop()
    }

    /// [§ 13.2.7 The end](https://html.spec.whatwg.org/multipage/parsing.html#stop-parsing)
    ///
    /// "Pop all the nodes off the stack of open elements."
    pub(super) fn stop_parsing(&mut self) {
        self.open_elements.truncate(0);
        self.stopped = true;
    }

    // =========================================================================
    // Node queries
    // =========================================================================

    /// "The current node is the bottommost node in this stack of open elements."
    pub(super) fn current_node(&self) -> Option<S::Handle> {
        self.open_elements.current()
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#adjusted-current-node)
    ///
    /// "The adjusted current node is the context element if the parser was
    /// created as part of the HTML fragment parsing algorithm and the stack of
    /// open elements has only one element in it (fragment case); otherwise,
    /// the adjusted current node is the current node."
    pub(super) fn adjusted_current_node(&self) -> Option<S::Handle> {
        match self.context_element {
            Some(context) if self.open_elements.len() == 1 => Some(context),
            _ => self.current_node(),
        }
    }

    pub(super) fn node_is(&self, node: S::Handle, name: &str) -> bool {
        is_html_named(&self.sink, node, name)
    }

    pub(super) fn node_is_one_of(&self, node: S::Handle, names: &[&str]) -> bool {
        is_html_one_of(&self.sink, node, names)
    }

    pub(super) fn current_node_is(&self, name: &str) -> bool {
        self.current_node().is_some_and(|node| self.node_is(node, name))
    }

    pub(super) fn current_node_is_one_of(&self, names: &[&str]) -> bool {
        self.current_node()
            .is_some_and(|node| self.node_is_one_of(node, names))
    }

    /// Whether the parser was created for a fragment.
    pub(super) const fn is_fragment_case(&self) -> bool {
        self.context_element.is_some()
    }

    pub(super) fn in_scope(&self, name: &str) -> bool {
        self.open_elements
            .has_element_in_scope(&self.sink, name, Scope::General)
    }

    pub(super) fn in_button_scope(&self, name: &str) -> bool {
        self.open_elements
            .has_element_in_scope(&self.sink, name, Scope::Button)
    }

    pub(super) fn in_list_item_scope(&self, name: &str) -> bool {
        self.open_elements
            .has_element_in_scope(&self.sink, name, Scope::ListItem)
    }

    pub(super) fn in_table_scope(&self, name: &str) -> bool {
        self.open_elements
            .has_element_in_scope(&self.sink, name, Scope::Table)
    }

    pub(super) fn in_select_scope(&self, name: &str) -> bool {
        self.open_elements
            .has_element_in_scope(&self.sink, name, Scope::Select)
    }

    /// Whether the stack has a template element anywhere.
    pub(super) fn template_is_open(&self) -> bool {
        self.open_elements.find(&self.sink, &["template"]).is_some()
    }

    pub(super) fn generate_implied_end_tags(&mut self, exclude: Option<&str>) {
        self.open_elements
            .generate_implied_end_tags(&self.sink, exclude);
    }

    pub(super) fn generate_implied_end_tags_thoroughly(&mut self) {
        self.open_elements
            .generate_implied_end_tags_thoroughly(&self.sink);
    }

    /// "Pop elements from the stack of open elements until a X element has
    /// been popped from the stack."
    pub(super) fn pop_until(&mut self, names: &[&str]) {
        self.open_elements.pop_until(&self.sink, names);
    }

    // =========================================================================
    // Creating and inserting nodes
    // =========================================================================

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
    ///
    /// "The appropriate place for inserting a node, optionally using a
    /// particular override target".
    pub(super) fn appropriate_place(&self, override_target: Option<S::Handle>) -> InsertionPoint<S::Handle> {
        // STEP 1: "If there was an override target specified, then let target be
        // the override target. Otherwise, let target be the current node."
        let Some(target) = override_target.or_else(|| self.current_node()) else {
            return InsertionPoint::LastChildOf(self.sink.document());
        };

        // STEP 2: "Determine the adjusted insertion location using the first
        // matching steps from the following list:"
        let parent = if self.foster_parenting
            && self.node_is_one_of(target, &["table", "tbody", "tfoot", "thead", "tr"])
        {
            // "Let last template be the last template element in the stack of
            // open elements, if any. Let last table be the last table element in
            // the stack of open elements, if any."
            let last_template = self.open_elements.find(&self.sink, &["template"]);
            let last_table = self.open_elements.find(&self.sink, &["table"]);

            match (last_template, last_table) {
                // "If there is a last template and either there is no last table,
                // or there is one, but last template is lower (more recently
                // added) than last table in the stack of open elements, then: let
                // adjusted insertion location be inside last template's template
                // contents, after its last child (if any), and abort these steps."
                (Some(template), table) if table.is_none_or(|table| template > table) => {
                    let template = self.open_elements.get(template);
                    let contents = template.and_then(|t| self.sink.template_contents(t));
                    return InsertionPoint::LastChildOf(contents.or(template).unwrap_or_else(|| self.sink.document()));
                }
                // "If there is no last table, then let adjusted insertion location
                // be inside the first element in the stack of open elements (the
                // html element), after its last child (if any), and abort these
                // steps. (fragment case)"
                (_, None) => self.open_elements.first().unwrap_or(target),
                (_, Some(table_index)) => {
                    let Some(table) = self.open_elements.get(table_index) else {
                        return InsertionPoint::LastChildOf(target);
                    };
                    // "If last table has a parent node, then let adjusted insertion
                    // location be inside last table's parent node, immediately
                    // before last table, and abort these steps."
                    if self.sink.parent(table).is_some() {
                        return InsertionPoint::BeforeSibling(table);
                    }
                    // "Let previous element be the element immediately above last
                    // table in the stack of open elements. Let adjusted insertion
                    // location be inside previous element, after its last child
                    // (if any)."
                    table_index
                        .checked_sub(1)
                        .and_then(|index| self.open_elements.get(index))
                        .unwrap_or(target)
                }
            }
        } else {
            // "Otherwise: Let adjusted insertion location be inside target, after
            // its last child (if any)."
            target
        };

        // STEP 3: "If the adjusted insertion location is inside a template
        // element, let it instead be inside the template element's template
        // contents, after its last child (if any)."
        if self.node_is(parent, "template")
            && let Some(contents) = self.sink.template_contents(parent)
        {
            return InsertionPoint::LastChildOf(contents);
        }

        InsertionPoint::LastChildOf(parent)
    }

    pub(super) fn insert_node_at(&mut self, place: InsertionPoint<S::Handle>, node: S::Handle) {
        match place {
            InsertionPoint::LastChildOf(parent) => self.sink.append_child(parent, node),
            InsertionPoint::BeforeSibling(sibling) => self.sink.insert_before(sibling, node),
        }
    }

    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    pub(super) fn insert_character(&mut self, c: char) {
        // STEP 2: "Let the adjusted insertion location be the appropriate place
        // for inserting a node."
        let place = self.appropriate_place(None);

        // STEP 3: "If the adjusted insertion location is in a Document node,
        // then return."
        if place == InsertionPoint::LastChildOf(self.sink.document()) {
            return;
        }

        // STEP 4: "If there is a Text node immediately before the adjusted
        // insertion location, then append data to that Text node's data.
        // Otherwise, create a new Text node..." The sink merges.
        let mut buffer = [0; 4];
        let text = c.encode_utf8(&mut buffer);
        match place {
            InsertionPoint::LastChildOf(parent) => self.sink.append_text(parent, text),
            InsertionPoint::BeforeSibling(sibling) => self.sink.insert_text_before(sibling, text),
        }
    }

    /// [§ 13.2.6.1 Insert a comment](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-comment)
    ///
    /// "When the steps below require the user agent to insert a comment while
    /// processing a comment token, optionally with an explicitly insertion
    /// position position, the user agent must run the following steps:"
    pub(super) fn insert_comment(&mut self, data: &str, position: Option<InsertionPoint<S::Handle>>) {
        // STEP 1: "If position was specified, then let the adjusted insertion
        // location be position. Otherwise, let adjusted insertion location be
        // the appropriate place for inserting a node."
        let place = position.unwrap_or_else(|| self.appropriate_place(None));
        // STEP 2: "Create a Comment node whose data attribute is set to data"
        let comment = self.sink.create_comment(data);
        self.count_node();
        // STEP 3: "Insert the newly created node at the adjusted insertion location."
        self.insert_node_at(place, comment);
    }

    /// Insert a comment as the last child of the Document object.
    pub(super) fn insert_comment_in_document(&mut self, data: &str) {
        let document = self.sink.document();
        self.insert_comment(data, Some(InsertionPoint::LastChildOf(document)));
    }

    /// [§ 13.2.6.1 Create an element for a token](https://html.spec.whatwg.org/multipage/parsing.html#create-an-element-for-the-token)
    ///
    /// Custom elements, form association and script preparation have no
    /// counterpart here; the element is created with its name, namespace and
    /// attributes.
    pub(super) fn create_element(&mut self, name: &str, namespace: Namespace, attrs: Vec<Attribute>) -> S::Handle {
        self.count_node();
        self.sink.create_element(name, namespace, attrs)
    }

    /// [§ 13.2.6.1 Insert a foreign element](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-foreign-element)
    ///
    /// "1. Let the adjusted insertion location be the appropriate place for
    /// inserting a node.
    /// 2. Let element be the result of creating an element for the token in
    /// the given namespace, with the intended parent being the element in
    /// which the adjusted insertion location finds itself.
    /// 3. If onlyAddToElementStack is false, then run insert an element at the
    /// adjusted insertion location with element.
    /// 4. Push element onto the stack of open elements so that it is the new
    /// current node.
    /// 5. Return element."
    pub(super) fn insert_element(
        &mut self,
        name: &str,
        namespace: Namespace,
        attrs: Vec<Attribute>,
        only_add_to_element_stack: bool,
    ) -> S::Handle {
        let place = self.appropriate_place(None);
        let element = self.create_element(name, namespace, attrs);
        if !only_add_to_element_stack {
            self.insert_node_at(place, element);
        }
        self.push_open_element(element);
        element
    }

    /// [§ 13.2.6.1 Insert an HTML element](https://html.spec.whatwg.org/multipage/parsing.html#insert-an-html-element)
    ///
    /// "When the steps below require the user agent to insert an HTML element
    /// for a token, the user agent must insert a foreign element for the token,
    /// with the HTML namespace and false."
    pub(super) fn insert_html_element(&mut self, token: &Token) -> S::Handle {
        let name = token.tag_name().unwrap_or_default();
        self.insert_element(name, Namespace::Html, token.attributes().to_vec(), false)
    }

    /// Insert an HTML element for a start tag the parser made up, such as the
    /// implied `head`, `body`, `tbody` or `tr`.
    pub(super) fn insert_html_element_named(&mut self, name: &str) -> S::Handle {
        self.insert_element(name, Namespace::Html, Vec::new(), false)
    }

    /// [§ 13.2.6.2 Parsing elements that contain only text](https://html.spec.whatwg.org/multipage/parsing.html#generic-raw-text-element-parsing-algorithm)
    ///
    /// "The generic raw text element parsing algorithm and the generic RCDATA
    /// element parsing algorithm consist of the following steps.
    /// 1. Insert an HTML element for the token.
    /// 2. If the algorithm that was invoked is the generic raw text element
    /// parsing algorithm, switch the tokenizer to the RAWTEXT state; otherwise
    /// the algorithm invoked was the generic RCDATA element parsing algorithm,
    /// switch the tokenizer to the RCDATA state.
    /// 3. Set the original insertion mode to the current insertion mode.
    /// 4. Then, switch the insertion mode to "text"."
    pub(super) fn parse_text_element(&mut self, token: &Token, state: TokenizerState) {
        let _ = self.insert_html_element(token);
        self.switch_tokenizer_to(state);
        self.original_mode = Some(self.mode);
        self.switch_mode(InsertionMode::Text);
    }

    // =========================================================================
    // Shared algorithms
    // =========================================================================

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#reset-the-insertion-mode-appropriately)
    ///
    /// "When the steps below require the UA to reset the insertion mode
    /// appropriately, it means the UA must follow these steps:"
    pub(super) fn reset_insertion_mode_appropriately(&mut self) {
        // STEP 1-2: "Let last be false. Let node be the last node in the stack of
        // open elements."
        for index in (0..self.open_elements.len()).rev() {
            let Some(mut node) = self.open_elements.get(index) else {
                continue;
            };
            // STEP 3: "Loop: If node is the first node in the stack of open
            // elements, then set last to true, and, if the parser was created as
            // part of the HTML fragment parsing algorithm (fragment case), set
            // node to the context element passed to that algorithm."
            let last = index == 0;
            if last && let Some(context) = self.context_element {
                node = context;
            }
            let Some((Namespace::Html, name)) = self.sink.element_name(node) else {
                if last {
                    self.switch_mode(InsertionMode::InBody);
                    return;
                }
                continue;
            };

            let mode = match name {
                // STEP 4: "If node is a select element, run these substeps: ..."
                "select" => {
                    if !last {
                        for ancestor_index in (0..index).rev() {
                            let Some(ancestor) = self.open_elements.get(ancestor_index) else {
                                break;
                            };
                            if self.node_is(ancestor, "template") {
                                break;
                            }
                            if self.node_is(ancestor, "table") {
                                self.switch_mode(InsertionMode::InSelectInTable);
                                return;
                            }
                        }
                    }
                    Some(InsertionMode::InSelect)
                }
                // STEP 5: "If node is a td or th element and last is false, then
                // switch the insertion mode to "in cell" and return."
                "td" | "th" if !last => Some(InsertionMode::InCell),
                "tr" => Some(InsertionMode::InRow),
                "tbody" | "thead" | "tfoot" => Some(InsertionMode::InTableBody),
                "caption" => Some(InsertionMode::InCaption),
                "colgroup" => Some(InsertionMode::InColumnGroup),
                "table" => Some(InsertionMode::InTable),
                // STEP 11: "If node is a template element, then switch the
                // insertion mode to the current template insertion mode and return."
                "template" => Some(
                    self.template_modes
                        .last()
                        .copied()
                        .unwrap_or(InsertionMode::InTemplate),
                ),
                "head" if !last => Some(InsertionMode::InHead),
                "body" => Some(InsertionMode::InBody),
                "frameset" => Some(InsertionMode::InFrameset),
                // STEP 15: "If node is an html element, run these substeps: If the
                // head element pointer is null, switch the insertion mode to
                // "before head" and return. (fragment case) Otherwise, the head
                // element pointer is not null, switch the insertion mode to "after
                // head" and return."
                "html" => Some(if self.head_element.is_none() {
                    InsertionMode::BeforeHead
                } else {
                    InsertionMode::AfterHead
                }),
                _ => None,
            };

            if let Some(mode) = mode {
                self.switch_mode(mode);
                return;
            }
            // STEP 16: "If last is true, then switch the insertion mode to "in
            // body" and return. (fragment case)"
            if last {
                self.switch_mode(InsertionMode::InBody);
                return;
            }
        }
        self.switch_mode(InsertionMode::InBody);
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#reconstruct-the-active-formatting-elements)
    ///
    /// "8. Create: Insert an HTML element for the token for which the element
    /// entry was created, to obtain new element.
    /// 9. Replace the entry for entry in the list with an entry for new element.
    /// 10. If the entry for new element in the list of active formatting
    /// elements is not the last entry in the list, return to the step labeled
    /// advance."
    pub(super) fn reconstruct_active_formatting_elements(&mut self) {
        let Some(start) = self
            .active_formatting
            .reconstruction_start(&self.open_elements)
        else {
            return;
        };
        for index in start..self.active_formatting.len() {
            let Some(token) = self
                .active_formatting
                .get(index)
                .and_then(|entry| entry.token())
                .cloned()
            else {
                continue;
            };
            let element = self.insert_html_element(&token);
            self.active_formatting.replace_node(index, element);
        }
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#close-a-p-element)
    ///
    /// "Generate implied end tags, except for p elements. If the current node
    /// is not a p element, then this is a parse error. Pop elements from the
    /// stack of open elements until a p element has been popped from the
    /// stack."
    pub(super) fn close_p_element(&mut self, token: &Token) {
        self.generate_implied_end_tags(Some("p"));
        if !self.current_node_is("p") {
            self.parse_error(ParseErrorKind::ImplicitlyClosedElement, token);
        }
        self.pop_until(&["p"]);
    }

    /// [§ 13.2.6.4.15](https://html.spec.whatwg.org/multipage/parsing.html#close-the-cell)
    ///
    /// "1. Generate implied end tags.
    /// 2. If the current node is not now a td element or a th element, then
    /// this is a parse error.
    /// 3. Pop elements from the stack of open elements stack until a td
    /// element or a th element has been popped from the stack.
    /// 4. Clear the list of active formatting elements up to the last marker.
    /// 5. Switch the insertion mode to "in row"."
    pub(super) fn close_the_cell(&mut self, token: &Token) {
        self.generate_implied_end_tags(None);
        if !self.current_node_is_one_of(&["td", "th"]) {
            self.parse_error(ParseErrorKind::ImplicitlyClosedElement, token);
        }
        self.pop_until(&["td", "th"]);
        self.active_formatting.clear_to_last_marker();
        self.switch_mode(InsertionMode::InRow);
    }
}

/// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#special)
///
/// "The following elements have varying levels of special parsing rules"
#[must_use]
pub fn is_special_element(namespace: Namespace, name: &str) -> bool {
    match namespace {
        Namespace::Html => matches!(
            name,
            "address"
                | "applet"
                | "area"
                | "article"
                | "aside"
                | "base"
                | "basefont"
                | "bgsound"
                | "blockquote"
                | "body"
                | "br"
                | "button"
                | "caption"
                | "center"
                | "col"
                | "colgroup"
                | "dd"
                | "details"
                | "dir"
                | "div"
                | "dl"
                | "dt"
                | "embed"
                | "fieldset"
                | "figcaption"
                | "figure"
                | "footer"
                | "form"
                | "frame"
                | "frameset"
                | "h1"
                | "h2"
                | "h3"
                | "h4"
                | "h5"
                | "h6"
                | "head"
                | "header"
                | "hgroup"
                | "hr"
                | "html"
                | "iframe"
                | "img"
                | "input"
                | "keygen"
                | "li"
                | "link"
                | "listing"
                | "main"
                | "marquee"
                | "menu"
                | "meta"
                | "nav"
                | "noembed"
                | "noframes"
                | "noscript"
                | "object"
                | "ol"
                | "p"
                | "param"
                | "plaintext"
                | "pre"
                | "script"
                | "search"
                | "section"
                | "select"
                | "source"
                | "style"
                | "summary"
                | "table"
                | "tbody"
                | "td"
                | "template"
                | "textarea"
                | "tfoot"
                | "th"
                | "thead"
                | "title"
                | "tr"
                | "track"
                | "ul"
                | "wbr"
                | "xmp"
        ),
        Namespace::MathMl => matches!(name, "mi" | "mo" | "mn" | "ms" | "mtext" | "annotation-xml"),
        Namespace::Svg => matches!(name, "foreignObject" | "desc" | "title"),
        _ => false,
    }
}

/// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#formatting)
///
/// "The following HTML elements are those that end up in the list of active
/// formatting elements: a, b, big, code, em, font, i, nobr, s, small, strike,
/// strong, tt, and u."
#[must_use]
pub fn is_formatting_element(name: &str) -> bool {
    matches!(
        name,
        "a" | "b" | "big" | "code" | "em" | "font" | "i" | "nobr" | "s" | "small" | "strike" | "strong" | "tt" | "u"
    )
}

/// "A character token that is one of U+0009 CHARACTER TABULATION, U+000A LINE
/// FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or U+0020
/// SPACE"
pub(super) const fn is_whitespace(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' ')
}
