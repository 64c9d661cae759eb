//! The "after body", "in frameset", "after frameset", "after after body" and
//! "after after frameset" insertion modes.

use wattle_common::ParseErrorKind;

use crate::parser::core::{InsertionMode, InsertionPoint, ProcessResult, TreeBuilder, is_whitespace};
use crate::sink::TreeSink;
use crate::tokenizer::Token;

impl<S: TreeSink> TreeBuilder<S> {
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    pub(in crate::parser) fn handle_after_body_mode(&mut self, token: &Token) -> ProcessResult {
        match token {
            Token::Character { data } if is_whitespace(*data) => {
                return ProcessResult::ReprocessUsing(InsertionMode::InBody);
            }

            // "A comment token"
            // "Insert a comment as the last child of the first element in the stack
            // of open elements (the html element)."
            Token::Comment { data } => {
                let place = self
                    .open_elements
                    .first()
                    .map(InsertionPoint::LastChildOf);
                self.insert_comment(data, place);
            }

            Token::Doctype { .. } => self.parse_error(ParseErrorKind::UnexpectedDoctype, token),

            Token::StartTag { name, .. } if name == "html" => {
                return ProcessResult::ReprocessUsing(InsertionMode::InBody);
            }

            // "An end tag whose tag name is "html""
            // "If the parser was created as part of the HTML fragment parsing
            // algorithm, this is a parse error; ignore the token. (fragment case)
            // Otherwise, switch the insertion mode to "after after body"."
            Token::EndTag { name, .. } if name == "html" => {
                if self.is_fragment_case() {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag, token);
                } else {
                    self.switch_mode(InsertionMode::AfterAfterBody);
                }
            }

            // "An end-of-file token"
            // "Stop parsing."
            Token::EndOfFile => self.stop_parsing(),

            // "Anything else"
            // "Parse error. Switch the insertion mode to "in body" and reprocess the
            // token."
            _ => {
                self.parse_error(unexpected_kind(token), token);
                self.switch_mode(InsertionMode::InBody);
                return ProcessResult::Reprocess;
            }
        }
        ProcessResult::Done
    }

    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    pub(in crate::parser) fn handle_in_frameset_mode(&mut self, token: &Token) -> ProcessResult {
        match token {
            Token::Character { data } if is_whitespace(*data) => self.insert_character(*data),

            Token::Comment { data } => self.insert_comment(data, None),

            Token::Doctype { .. } => self.parse_error(ParseErrorKind::UnexpectedDoctype, token),

            Token::StartTag { name, .. } => match name.as_str() {
                "html" => return ProcessResult::ReprocessUsing(InsertionMode::InBody),
                "frameset" => {
                    let _ = self.insert_html_element(token);
                }
                // "Insert an HTML element for the token. Immediately pop the current
                // node off the stack of open elements. Acknowledge the token's
                // self-closing flag, if it is set."
                "frame" => {
                    let _ = self.insert_html_element(token);
                    let _ = self.pop_current();
                    self.acknowledge_self_closing_flag();
                }
                "noframes" => return ProcessResult::ReprocessUsing(InsertionMode::InHead),
                _ => self.parse_error(ParseErrorKind::UnexpectedStartTag, token),
            },

            // "An end tag whose tag name is "frameset""
            Token::EndTag { name, .. } if name == "frameset" => {
                // "If the current node is the root html element, then this is a parse
                // error; ignore the token. (fragment case)"
                if self.current_node_is_root() {
                    self.parse_error(ParseErrorKind::UnexpectedEndTag, token);
                    return ProcessResult::Done;
                }
                // "Otherwise, pop the current node from the stack of open elements.
                // If the parser was not created as part of the HTML fragment parsing
                // algorithm (fragment case), and the current node is no longer a
                // frameset element, then switch the insertion mode to "after
                // frameset"."
                let _ = self.pop_current();
                if !self.is_fragment_case() && !self.current_node_is("frameset") {
                    self.switch_mode(InsertionMode::AfterFrameset);
                }
            }

            // "An end-of-file token"
            // "If the current node is not the root html element, then this is a
            // parse error. Note: The current node can only be the root html element
            // in the fragment case. Stop parsing."
            Token::EndOfFile => {
                if !self.current_node_is_root() {
                    self.parse_error(ParseErrorKind::UnexpectedEndOfFile, token);
                }
                self.stop_parsing();
            }

            _ => self.parse_error(unexpected_kind(token), token),
        }
        ProcessResult::Done
    }

    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    pub(in crate::parser) fn handle_after_frameset_mode(&mut self, token: &Token) -> ProcessResult {
        match token {
            Token::Character { data } if is_whitespace(*data) => self.insert_character(*data),

            Token::Comment { data } => self.insert_comment(data, None),

            Token::Doctype { .. } => self.parse_error(ParseErrorKind::UnexpectedDoctype, token),

            Token::StartTag { name, .. } if name == "html" => {
                return ProcessResult::ReprocessUsing(InsertionMode::InBody);
            }

            // "An end tag whose tag name is "html""
            // "Switch the insertion mode to "after after frameset"."
            Token::EndTag { name, .. } if name == "html" => {
                self.switch_mode(InsertionMode::AfterAfterFrameset);
            }

            Token::StartTag { name, .. } if name == "noframes" => {
                return ProcessResult::ReprocessUsing(InsertionMode::InHead);
            }

            Token::EndOfFile => self.stop_parsing(),

            _ => self.parse_error(unexpected_kind(token), token),
        }
        ProcessResult::Done
    }

    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    pub(in crate::parser) fn handle_after_after_body_mode(&mut self, token: &Token) -> ProcessResult {
        match token {
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data } => self.insert_comment_in_document(data),

            // "A DOCTYPE token / A character token that is one of U+0009 CHARACTER
            // TABULATION, ... / A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            Token::Doctype { .. } => return ProcessResult::ReprocessUsing(InsertionMode::InBody),
            Token::Character { data } if is_whitespace(*data) => {
                return ProcessResult::ReprocessUsing(InsertionMode::InBody);
            }
            Token::StartTag { name, .. } if name == "html" => {
                return ProcessResult::ReprocessUsing(InsertionMode::InBody);
            }

            Token::EndOfFile => self.stop_parsing(),

            // "Parse error. Switch the insertion mode to "in body" and reprocess the
            // token."
            _ => {
                self.parse_error(unexpected_kind(token), token);
                self.switch_mode(InsertionMode::InBody);
                return ProcessResult::Reprocess;
            }
        }
        ProcessResult::Done
    }

    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    pub(in crate::parser) fn handle_after_after_frameset_mode(&mut self, token: &Token) -> ProcessResult {
        match token {
            Token::Comment { data } => self.insert_comment_in_document(data),

            Token::Doctype { .. } => return ProcessResult::ReprocessUsing(InsertionMode::InBody),
            Token::Character { data } if is_whitespace(*data) => {
                return ProcessResult::ReprocessUsing(InsertionMode::InBody);
            }
            Token::StartTag { name, .. } if name == "html" => {
                return ProcessResult::ReprocessUsing(InsertionMode::InBody);
            }

            Token::EndOfFile => self.stop_parsing(),

            Token::StartTag { name, .. } if name == "noframes" => {
                return ProcessResult::ReprocessUsing(InsertionMode::InHead);
            }

            // "Parse error. Ignore the token."
            _ => self.parse_error(unexpected_kind(token), token),
        }
        ProcessResult::Done
    }

    fn current_node_is_root(&self) -> bool {
        self.open_elements.len() == 1 && self.current_node_is("html")
    }
}

/// The parse error kind for a token that has no place in the current mode.
const fn unexpected_kind(token: &Token) -> ParseErrorKind {
    match token {
        Token::StartTag { .. } => ParseErrorKind::UnexpectedStartTag,
        Token::EndTag { .. } => ParseErrorKind::UnexpectedEndTag,
        Token::Doctype { .. } => ParseErrorKind::UnexpectedDoctype,
        Token::Comment { .. } => ParseErrorKind::UnexpectedComment,
        Token::EndOfFile => ParseErrorKind::UnexpectedEndOfFile,
        Token::Character { .. } => ParseErrorKind::UnexpectedCharacter,
    }
}
