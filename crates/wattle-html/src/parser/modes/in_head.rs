//! The "in head", "in head noscript" and "after head" insertion modes.

use wattle_common::ParseErrorKind;

use crate::parser::core::{InsertionMode, ProcessResult, TreeBuilder, is_whitespace};
use crate::sink::TreeSink;
use crate::tokenizer::{Token, TokenizerState};

impl<S: TreeSink> TreeBuilder<S> {
    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    pub(in crate::parser) fn handle_in_head_mode(&mut self, token: &Token) -> ProcessResult {
        match token {
            // "Insert the character."
            Token::Character { data } if is_whitespace(*data) => self.insert_character(*data),

            Token::Comment { data } => self.insert_comment(data, None),

            Token::Doctype { .. } => self.parse_error(ParseErrorKind::UnexpectedDoctype, token),

            Token::StartTag { name, .. } => match name.as_str() {
                "html" => return ProcessResult::ReprocessUsing(InsertionMode::InBody),

                // "A start tag whose tag name is one of: "base", "basefont",
                // "bgsound", "link""
                // "Insert an HTML element for the token. Immediately pop the current
                // node off the stack of open elements. Acknowledge the token's
                // self-closing flag, if it is set."
                //
                // "A start tag whose tag name is "meta"": the same, plus encoding
                // changes, which do not apply to already decoded input.
                "base" | "basefont" | "bgsound" | "link" | "meta" => {
                    let _ = self.insert_html_element(token);
                    let _ = self.pop_current();
                    self.acknowledge_self_closing_flag();
                }

                // "Follow the generic RCDATA element parsing algorithm."
                "title" => self.parse_text_element(token, TokenizerState::RCDATA),

                // "A start tag whose tag name is "noscript", if the scripting flag
                // is enabled" / "A start tag whose tag name is one of: "noframes",
                // "style""
                // "Follow the generic raw text element parsing algorithm."
                "noscript" if self.scripting => self.parse_text_element(token, TokenizerState::RAWTEXT),
                "noframes" | "style" => self.parse_text_element(token, TokenizerState::RAWTEXT),

                // "A start tag whose tag name is "noscript", if the scripting flag
                // is disabled"
                "noscript" => {
                    let _ = self.insert_html_element(token);
                    self.switch_mode(InsertionMode::InHeadNoscript);
                }

                // "A start tag whose tag name is "script""
                // Steps 1-7 insert the element at the adjusted insertion location
                // and push it; steps 8-10 switch the tokenizer and the insertion
                // mode, as for any raw text element.
                "script" => self.parse_text_element(token, TokenizerState::ScriptData),

                // "A start tag whose tag name is "template""
                "template" => {
                    // "Insert an HTML element for the token."
                    let _ = self.insert_html_element(token);
                    // "Insert a marker at the end of the list of active formatting
                    // elements."
                    self.active_formatting.insert_marker();
                    // "Set the frameset-ok flag to "not ok"."
                    self.frameset_ok = false;
                    // "Switch the insertion mode to "in template"."
                    self.switch_mode(InsertionMode::InTemplate);
                    // "Push "in template" onto the stack of template insertion
                    // modes so that it is the new current template insertion mode."
                    self.template_modes.push(InsertionMode::InTemplate);
                }

                // "A start tag whose tag name is "head""
                // "Parse error. Ignore the token."
                "head" => self.parse_error(ParseErrorKind::UnexpectedStartTag, token),

                _ => return self.in_head_anything_else(),
            },

            Token::EndTag { name, .. } => match name.as_str() {
                // "An end tag whose tag name is "head""
                // "Pop the current node (which will be the head element) off the
                // stack of open elements. Switch the insertion mode to "after head"."
                "head" => {
                    let _ = self.pop_current();
                    self.switch_mode(InsertionMode::AfterHead);
                }

                "body" | "html" | "br" => return self.in_head_anything_else(),

                "template" => self.end_template(token),

                // "Any other end tag"
                _ => self.parse_error(ParseErrorKind::UnexpectedEndTag, token),
            },

            _ => return self.in_head_anything_else(),
        }
        ProcessResult::Done
    }

    /// "Pop the current node (which will be the head element) off the stack of
    /// open elements. Switch the insertion mode to "after head". Reprocess the
    /// token."
    fn in_head_anything_else(&mut self) -> ProcessResult {
        let _ = self.pop_current();
        self.switch_mode(InsertionMode::AfterHead);
        ProcessResult::Reprocess
    }

    /// "An end tag whose tag name is "template"" in the "in head" mode.
    fn end_template(&mut self, token: &Token) {
        // "If there is no template element on the stack of open elements, then
        // this is a parse error; ignore the token."
        if !self.template_is_open() {
            self.parse_error(ParseErrorKind::UnexpectedEndTag, token);
            return;
        }
        // STEP 1: "Generate all implied end tags thoroughly."
        self.generate_implied_end_tags_thoroughly();
        // STEP 2: "If the current node is not a template element, then this is a
        // parse error."
        if !self.current_node_is("template") {
            self.parse_error(ParseErrorKind::ImplicitlyClosedElement, token);
        }
        // STEP 3: "Pop elements from the stack of open elements until a template
        // element has been popped from the stack."
        self.pop_until(&["template"]);
        // STEP 4: "Clear the list of active formatting elements up to the last
        // marker."
        self.active_formatting.clear_to_last_marker();
        // STEP 5: "Pop the current template insertion mode off the stack of
        // template insertion modes."
        let _ = self.template_modes.pop();
        // STEP 6: "Reset the insertion mode appropriately."
        self.reset_insertion_mode_appropriately();
    }

    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    pub(in crate::parser) fn handle_in_head_noscript_mode(&mut self, token: &Token) -> ProcessResult {
        match token {
            Token::Doctype { .. } => self.parse_error(ParseErrorKind::UnexpectedDoctype, token),

            Token::StartTag { name, .. } if name == "html" => {
                return ProcessResult::ReprocessUsing(InsertionMode::InBody);
            }

            // "An end tag whose tag name is "noscript""
            // "Pop the current node (which will be a noscript element) from the
            // stack of open elements; the new current node will be a head element.
            // Switch the insertion mode to "in head"."
            Token::EndTag { name, .. } if name == "noscript" => {
                let _ = self.pop_current();
                self.switch_mode(InsertionMode::InHead);
            }

            // "A character token that is one of U+0009 CHARACTER TABULATION, ...
            // A comment token
            // A start tag whose tag name is one of: "basefont", "bgsound", "link",
            // "meta", "noframes", "style""
            // "Process the token using the rules for the "in head" insertion mode."
            Token::Character { data } if is_whitespace(*data) => {
                return ProcessResult::ReprocessUsing(InsertionMode::InHead);
            }
            Token::Comment { .. } => return ProcessResult::ReprocessUsing(InsertionMode::InHead),
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "basefont" | "bgsound" | "link" | "meta" | "noframes" | "style"
                ) =>
            {
                return ProcessResult::ReprocessUsing(InsertionMode::InHead);
            }

            Token::EndTag { name, .. } if name == "br" => return self.in_head_noscript_anything_else(token),

            // "A start tag whose tag name is one of: "head", "noscript"
            // Any other end tag"
            // "Parse error. Ignore the token."
            Token::StartTag { name, .. } if matches!(name.as_str(), "head" | "noscript") => {
                self.parse_error(ParseErrorKind::UnexpectedStartTag, token);
            }
            Token::EndTag { .. } => self.parse_error(ParseErrorKind::UnexpectedEndTag, token),

            _ => return self.in_head_noscript_anything_else(token),
        }
        ProcessResult::Done
    }

    /// "Parse error. Pop the current node (which will be a noscript element)
    /// from the stack of open elements; the new current node will be a head
    /// element. Switch the insertion mode to "in head". Reprocess the token."
    fn in_head_noscript_anything_else(&mut self, token: &Token) -> ProcessResult {
        let kind = match token {
            Token::StartTag { .. } => ParseErrorKind::UnexpectedStartTag,
            Token::EndTag { .. } => ParseErrorKind::UnexpectedEndTag,
            Token::EndOfFile => ParseErrorKind::UnexpectedEndOfFile,
            _ => ParseErrorKind::UnexpectedCharacter,
        };
        self.parse_error(kind, token);
        let _ = self.pop_current();
        self.switch_mode(InsertionMode::InHead);
        ProcessResult::Reprocess
    }

    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    pub(in crate::parser) fn handle_after_head_mode(&mut self, token: &Token) -> ProcessResult {
        match token {
            Token::Character { data } if is_whitespace(*data) => self.insert_character(*data),

            Token::Comment { data } => self.insert_comment(data, None),

            Token::Doctype { .. } => self.parse_error(ParseErrorKind::UnexpectedDoctype, token),

            Token::StartTag { name, .. } => match name.as_str() {
                "html" => return ProcessResult::ReprocessUsing(InsertionMode::InBody),

                // "Insert an HTML element for the token. Set the frameset-ok flag to
                // "not ok". Switch the insertion mode to "in body"."
                "body" => {
                    let _ = self.insert_html_element(token);
                    self.frameset_ok = false;
                    self.switch_mode(InsertionMode::InBody);
                }

                // "Insert an HTML element for the token. Switch the insertion mode
                // to "in frameset"."
                "frameset" => {
                    let _ = self.insert_html_element(token);
                    self.switch_mode(InsertionMode::InFrameset);
                }

                // "A start tag whose tag name is one of: "base", "basefont",
                // "bgsound", "link", "meta", "noframes", "script", "style",
                // "template", "title""
                "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script" | "style"
                | "template" | "title" => {
                    // "Parse error."
                    self.parse_error(ParseErrorKind::UnexpectedStartTag, token);
                    // "Push the node pointed to by the head element pointer onto the
                    // stack of open elements."
                    let Some(head) = self.head_element else {
                        return ProcessResult::ReprocessUsing(InsertionMode::InHead);
                    };
                    self.push_open_element(head);
                    // "Process the token using the rules for the "in head" insertion
                    // mode." Every one of these tags completes there.
                    let _ = self.handle_in_head_mode(token);
                    // "Remove the node pointed to by the head element pointer from
                    // the stack of open elements. (It might not be the current node
                    // at this point.)"
                    self.open_elements.remove(head);
                }

                "head" => self.parse_error(ParseErrorKind::UnexpectedStartTag, token),

                _ => return self.after_head_anything_else(),
            },

            Token::EndTag { name, .. } => match name.as_str() {
                "template" => return ProcessResult::ReprocessUsing(InsertionMode::InHead),
                "body" | "html" | "br" => return self.after_head_anything_else(),
                _ => self.parse_error(ParseErrorKind::UnexpectedEndTag, token),
            },

            _ => return self.after_head_anything_else(),
        }
        ProcessResult::Done
    }

    /// "Insert an HTML element for a "body" start tag token with no attributes.
    /// Switch the insertion mode to "in body". Reprocess the current token."
    fn after_head_anything_else(&mut self) -> ProcessResult {
        let _ = self.insert_html_element_named("body");
        self.switch_mode(InsertionMode::InBody);
        ProcessResult::Reprocess
    }
}
