//! The "in select" and "in select in table" insertion modes.

use wattle_common::ParseErrorKind;

use crate::parser::core::{InsertionMode, ProcessResult, TreeBuilder};
use crate::sink::TreeSink;
use crate::tokenizer::Token;

const TABLE_ELEMENTS: &[&str] = &["caption", "table", "tbody", "tfoot", "thead", "tr", "td", "th"];

impl<S: TreeSink> TreeBuilder<S> {
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    pub(in crate::parser) fn handle_in_select_mode(&mut self, token: &Token) -> ProcessResult {
        match token {
            Token::Character { data: '\0' } => {
                self.parse_error(ParseErrorKind::UnexpectedCharacter, token);
            }

            // "Any other character token"
            // "Insert the token's character."
            Token::Character { data } => self.insert_character(*data),

            Token::Comment { data } => self.insert_comment(data, None),

            Token::Doctype { .. } => self.parse_error(ParseErrorKind::UnexpectedDoctype, token),

            Token::StartTag { name, .. } => match name.as_str() {
                "html" => return ProcessResult::ReprocessUsing(InsertionMode::InBody),

                // "If the current node is an option element, pop that node from the
                // stack of open elements. Insert an HTML element for the token."
                "option" => {
                    self.pop_if_current_is("option");
                    let _ = self.insert_html_element(token);
                }

                // "If the current node is an option element, pop that node from the
                // stack of open elements. If the current node is an optgroup element,
                // pop that node from the stack of open elements. Insert an HTML
                // element for the token."
                "optgroup" => {
                    self.pop_if_current_is("option");
                    self.pop_if_current_is("optgroup");
                    let _ = self.insert_html_element(token);
                }

                // "A start tag whose tag name is "hr""
                "hr" => {
                    self.pop_if_current_is("option");
                    self.pop_if_current_is("optgroup");
                    let _ = self.insert_html_element(token);
                    let _ = self.pop_current();
                    self.acknowledge_self_closing_flag();
                }

                // "A start tag whose tag name is "select""
                // "Parse error. If the stack of open elements does not have a select
                // element in select scope, ignore the token. (fragment case)
                // Otherwise: Pop elements from the stack of open elements until a
                // select element has been popped from the stack. Reset the insertion
                // mode appropriately."
                "select" => {
                    self.parse_error(ParseErrorKind::UnexpectedStartTag, token);
                    let _ = self.close_select();
                }

                // "A start tag whose tag name is one of: "input", "keygen", "textarea""
                // "... Reprocess the token."
                "input" | "keygen" | "textarea" => {
                    self.parse_error(ParseErrorKind::UnexpectedStartTag, token);
                    if self.close_select() {
                        return ProcessResult::Reprocess;
                    }
                }

                "script" | "template" => return ProcessResult::ReprocessUsing(InsertionMode::InHead),

                _ => self.parse_error(ParseErrorKind::UnexpectedStartTag, token),
            },

            Token::EndTag { name, .. } => match name.as_str() {
                // "An end tag whose tag name is "optgroup""
                "optgroup" => {
                    // "First, if the current node is an option element, and the node
                    // immediately before it in the stack of open elements is an
                    // optgroup element, then pop the current node from the stack of
                    // open elements."
                    let len = self.open_elements.len();
                    let before_is_optgroup = len
                        .checked_sub(2)
                        .and_then(|index| self.open_elements.get(index))
                        .is_some_and(|node| self.node_is(node, "optgroup"));
                    if self.current_node_is("option") && before_is_optgroup {
                        let _ = self.pop_current();
                    }
                    // "If the current node is an optgroup element, then pop that node
                    // from the stack of open elements. Otherwise, this is a parse
                    // error; ignore the token."
                    if self.current_node_is("optgroup") {
                        let _ = self.pop_current();
                    } else {
                        self.parse_error(ParseErrorKind::UnexpectedEndTag, token);
                    }
                }

                // "An end tag whose tag name is "option""
                "option" => {
                    if self.current_node_is("option") {
                        let _ = self.pop_current();
                    } else {
                        self.parse_error(ParseErrorKind::UnexpectedEndTag, token);
                    }
                }

                // "An end tag whose tag name is "select""
                "select" => {
                    if !self.close_select() {
                        self.parse_error(ParseErrorKind::UnexpectedEndTag, token);
                    }
                }

                "template" => return ProcessResult::ReprocessUsing(InsertionMode::InHead),

                _ => self.parse_error(ParseErrorKind::UnexpectedEndTag, token),
            },

            Token::EndOfFile => return ProcessResult::ReprocessUsing(InsertionMode::InBody),
        }
        ProcessResult::Done
    }

    fn pop_if_current_is(&mut self, name: &str) {
        if self.current_node_is(name) {
            let _ = self.pop_current();
        }
    }

    /// "Pop elements from the stack of open elements until a select element has
    /// been popped from the stack. Reset the insertion mode appropriately."
    ///
    /// Nothing happens, and `false` comes back, when there is no select element
    /// in select scope.
    fn close_select(&mut self) -> bool {
        if !self.in_select_scope("select") {
            return false;
        }
        self.pop_until(&["select"]);
        self.reset_insertion_mode_appropriately();
        true
    }

    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    pub(in crate::parser) fn handle_in_select_in_table_mode(&mut self, token: &Token) -> ProcessResult {
        match token {
            // "A start tag whose tag name is one of: "caption", "table", "tbody",
            // "tfoot", "thead", "tr", "td", "th""
            // "Parse error. Pop elements from the stack of open elements until a
            // select element has been popped from the stack. Reset the insertion
            // mode appropriately. Reprocess the token."
            Token::StartTag { name, .. } if TABLE_ELEMENTS.contains(&name.as_str()) => {
                self.parse_error(ParseErrorKind::UnexpectedStartTag, token);
                self.pop_until(&["select"]);
                self.reset_insertion_mode_appropriately();
                ProcessResult::Reprocess
            }

            // "An end tag whose tag name is one of: "caption", "table", "tbody",
            // "tfoot", "thead", "tr", "td", "th""
            Token::EndTag { name, .. } if TABLE_ELEMENTS.contains(&name.as_str()) => {
                // "Parse error. If the stack of open elements does not have an
                // element in table scope that is an HTML element with the same tag
                // name as that of the token, then ignore the token."
                self.parse_error(ParseErrorKind::UnexpectedEndTag, token);
                if !self.in_table_scope(name) {
                    return ProcessResult::Done;
                }
                self.pop_until(&["select"]);
                self.reset_insertion_mode_appropriately();
                ProcessResult::Reprocess
            }

            _ => ProcessResult::ReprocessUsing(InsertionMode::InSelect),
        }
    }
}
