//! [§ 13.2.6.4.18 The "in template" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)

use wattle_common::ParseErrorKind;

use crate::parser::core::{InsertionMode, ProcessResult, TreeBuilder};
use crate::sink::TreeSink;
use crate::tokenizer::Token;

impl<S: TreeSink> TreeBuilder<S> {
    pub(in crate::parser) fn handle_in_template_mode(&mut self, token: &Token) -> ProcessResult {
        match token {
            // "A character token / A comment token / A DOCTYPE token"
            // "Process the token using the rules for the "in body" insertion mode."
            Token::Character { .. } | Token::Comment { .. } | Token::Doctype { .. } => {
                ProcessResult::ReprocessUsing(InsertionMode::InBody)
            }

            Token::StartTag { name, .. } => {
                let mode = match name.as_str() {
                    // "Process the token using the rules for the "in head" insertion
                    // mode."
                    "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script" | "style"
                    | "template" | "title" => return ProcessResult::ReprocessUsing(InsertionMode::InHead),
                    "caption" | "colgroup" | "tbody" | "tfoot" | "thead" => InsertionMode::InTable,
                    "col" => InsertionMode::InColumnGroup,
                    "tr" => InsertionMode::InTableBody,
                    "td" | "th" => InsertionMode::InRow,
                    _ => InsertionMode::InBody,
                };
                // "Pop the current template insertion mode off the stack of template
                // insertion modes. Push "in table" onto the stack of template
                // insertion modes so that it is the new current template insertion
                // mode. Switch the insertion mode to "in table", and reprocess the
                // token." (and likewise for the other modes)
                let _ = self.template_modes.pop();
                self.template_modes.push(mode);
                self.switch_mode(mode);
                ProcessResult::Reprocess
            }

            Token::EndTag { name, .. } if name == "template" => {
                ProcessResult::ReprocessUsing(InsertionMode::InHead)
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::EndTag { .. } => {
                self.parse_error(ParseErrorKind::UnexpectedEndTag, token);
                ProcessResult::Done
            }

            // "An end-of-file token"
            Token::EndOfFile => {
                // "If there is no template element on the stack of open elements,
                // then stop parsing. (fragment case)"
                if !self.template_is_open() {
                    self.stop_parsing();
                    return ProcessResult::Done;
                }
                // "Otherwise, this is a parse error. Pop elements from the stack of
                // open elements until a template element has been popped from the
                // stack. Clear the list of active formatting elements up to the last
                // marker. Pop the current template insertion mode off the stack of
                // template insertion modes. Reset the insertion mode appropriately.
                // Reprocess the token."
                self.parse_error(ParseErrorKind::UnexpectedEndOfFile, token);
                self.pop_until(&["template"]);
                self.active_formatting.clear_to_last_marker();
                let _ = self.template_modes.pop();
                self.reset_insertion_mode_appropriately();
                ProcessResult::Reprocess
            }
        }
    }
}
