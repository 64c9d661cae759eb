//! The "initial", "before html" and "before head" insertion modes.

use wattle_common::ParseErrorKind;
use wattle_dom::{Namespace, QuirksMode};

use crate::parser::core::{InsertionMode, ProcessResult, TreeBuilder, is_whitespace};
use crate::parser::quirks::{is_conforming_doctype, quirks_mode_for_doctype};
use crate::sink::TreeSink;
use crate::tokenizer::Token;

impl<S: TreeSink> TreeBuilder<S> {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    pub(in crate::parser) fn handle_initial_mode(&mut self, token: &Token) -> ProcessResult {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, U+000A
            // LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or
            // U+0020 SPACE"
            // "Ignore the token."
            Token::Character { data } if is_whitespace(*data) => {}

            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data } => self.insert_comment_in_document(data),

            // "A DOCTYPE token"
            Token::Doctype {
                name,
                public_identifier,
                system_identifier,
                force_quirks,
            } => {
                let (name, public_id, system_id) =
                    (name.as_deref(), public_identifier.as_deref(), system_identifier.as_deref());

                // "If the DOCTYPE token's name is not "html", or the token's public
                // identifier is not missing, or the token's system identifier is
                // neither missing nor "about:legacy-compat", then there is a parse
                // error."
                if !is_conforming_doctype(name, public_id, system_id) {
                    self.parse_error(ParseErrorKind::NonConformingDoctype, token);
                }

                // "Append a DocumentType node to the Document node, with its name set
                // to the name given in the DOCTYPE token, or the empty string if the
                // name was missing; its public ID set to the public identifier given
                // in the DOCTYPE token, or the empty string if the public identifier
                // was missing; and its system ID set to the system identifier given
                // in the DOCTYPE token, or the empty string if the system identifier
                // was missing."
                let doctype = self.sink.create_doctype(
                    name.unwrap_or_default(),
                    public_id.unwrap_or_default(),
                    system_id.unwrap_or_default(),
                );
                self.count_node();
                let document = self.sink.document();
                self.sink.append_child(document, doctype);

                // "Then, if the document is not an iframe srcdoc document, and the
                // parser cannot change the mode flag is false, and the DOCTYPE token
                // matches one of the conditions in the following list, then set the
                // Document to quirks mode"
                if !self.iframe_srcdoc {
                    let mode = quirks_mode_for_doctype(name, public_id, system_id, *force_quirks);
                    self.set_quirks_mode(mode);
                }

                // "Then, switch the insertion mode to "before html"."
                self.switch_mode(InsertionMode::BeforeHtml);
            }

            // "Anything else"
            _ => {
                // "If the document is not an iframe srcdoc document, then this is a
                // parse error; if the parser cannot change the mode flag is false,
                // set the Document to quirks mode."
                if !self.iframe_srcdoc {
                    self.parse_error(ParseErrorKind::MissingDoctype, token);
                    self.set_quirks_mode(QuirksMode::Quirks);
                }
                // "In any case, switch the insertion mode to "before html", then
                // reprocess the token."
                self.switch_mode(InsertionMode::BeforeHtml);
                return ProcessResult::Reprocess;
            }
        }
        ProcessResult::Done
    }

    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    pub(in crate::parser) fn handle_before_html_mode(&mut self, token: &Token) -> ProcessResult {
        match token {
            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => self.parse_error(ParseErrorKind::UnexpectedDoctype, token),

            // "A comment token"
            Token::Comment { data } => self.insert_comment_in_document(data),

            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "Ignore the token."
            Token::Character { data } if is_whitespace(*data) => {}

            // "A start tag whose tag name is "html""
            // "Create an element for the token in the HTML namespace, with the
            // Document as the intended parent. Append it to the Document object.
            // Put this element in the stack of open elements."
            Token::StartTag {
                name, attributes, ..
            } if name == "html" => {
                let html = self.create_element("html", Namespace::Html, attributes.clone());
                let document = self.sink.document();
                self.sink.append_child(document, html);
                self.push_open_element(html);
                // "Switch the insertion mode to "before head"."
                self.switch_mode(InsertionMode::BeforeHead);
            }

            // "An end tag whose tag name is one of: "head", "body", "html", "br""
            // "Act as described in the "anything else" entry below."
            Token::EndTag { name, .. } if matches!(name.as_str(), "head" | "body" | "html" | "br") => {
                return self.before_html_anything_else();
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::EndTag { .. } => self.parse_error(ParseErrorKind::UnexpectedEndTag, token),

            // "Anything else"
            _ => return self.before_html_anything_else(),
        }
        ProcessResult::Done
    }

    /// "Create an html element whose node document is the Document object.
    /// Append it to the Document object. Put this element in the stack of open
    /// elements. Switch the insertion mode to "before head", then reprocess
    /// the token."
    fn before_html_anything_else(&mut self) -> ProcessResult {
        let html = self.create_element("html", Namespace::Html, Vec::new());
        let document = self.sink.document();
        self.sink.append_child(document, html);
        self.push_open_element(html);
        self.switch_mode(InsertionMode::BeforeHead);
        ProcessResult::Reprocess
    }

    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    pub(in crate::parser) fn handle_before_head_mode(&mut self, token: &Token) -> ProcessResult {
        match token {
            // "Ignore the token."
            Token::Character { data } if is_whitespace(*data) => {}

            // "Insert a comment."
            Token::Comment { data } => self.insert_comment(data, None),

            // "Parse error. Ignore the token."
            Token::Doctype { .. } => self.parse_error(ParseErrorKind::UnexpectedDoctype, token),

            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            Token::StartTag { name, .. } if name == "html" => {
                return ProcessResult::ReprocessUsing(InsertionMode::InBody);
            }

            // "A start tag whose tag name is "head""
            // "Insert an HTML element for the token. Set the head element pointer
            // to the newly created head element. Switch the insertion mode to "in
            // head"."
            Token::StartTag { name, .. } if name == "head" => {
                let head = self.insert_html_element(token);
                self.head_element = Some(head);
                self.switch_mode(InsertionMode::InHead);
            }

            // "An end tag whose tag name is one of: "head", "body", "html", "br""
            Token::EndTag { name, .. } if matches!(name.as_str(), "head" | "body" | "html" | "br") => {
                return self.before_head_anything_else();
            }

            // "Any other end tag"
            Token::EndTag { .. } => self.parse_error(ParseErrorKind::UnexpectedEndTag, token),

            _ => return self.before_head_anything_else(),
        }
        ProcessResult::Done
    }

    /// "Insert an HTML element for a "head" start tag token with no attributes.
    /// Set the head element pointer to the newly created head element. Switch
    /// the insertion mode to "in head". Reprocess the current token."
    fn before_head_anything_else(&mut self) -> ProcessResult {
        let head = self.insert_html_element_named("head");
        self.head_element = Some(head);
        self.switch_mode(InsertionMode::InHead);
        ProcessResult::Reprocess
    }

    pub(in crate::parser) fn set_quirks_mode(&mut self, mode: QuirksMode) {
        self.quirks_mode = mode;
        self.sink.set_quirks_mode(mode);
    }
}
